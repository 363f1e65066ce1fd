use posmrp_core::Aggregate;

/// Decide then evolve: runs `handle` and applies every resulting event to the
/// aggregate in place.
///
/// Adapters use this to move a record through its lifecycle (sale
/// finalization, manufacturing order confirmation, stock reservation) before
/// persisting it. Nothing is applied when `handle` fails.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
