use crate::error::PosMrpError;
use crate::ports::UnitOfWork;

/// Runs `f` inside a unit of work: commit on `Ok`, rollback on `Err`.
///
/// The original error is returned even when the rollback itself fails; the
/// rollback failure is logged.
pub fn in_transaction<T, F>(uow: &dyn UnitOfWork, f: F) -> Result<T, PosMrpError>
where
    F: FnOnce() -> Result<T, PosMrpError>,
{
    uow.begin()?;
    match f() {
        Ok(value) => {
            uow.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback() {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
