//! Sale finalization hook.

use chrono::Utc;

use posmrp_core::{AggregateRoot, ExpectedVersion, TenantId};
use posmrp_events::execute;
use posmrp_manufacturing::ManufacturingOrderId;
use posmrp_sales::{FinalizeSale, SaleCommand, SaleId};

use crate::availability::AvailabilityChecker;
use crate::builder::ManufacturingOrderBuilder;
use crate::error::{PortError, PosMrpError};
use crate::ports::{Ports, SaleRepository, UnitOfWork};
use crate::sequencer::OrderCreationSequencer;
use crate::settings::PosMrpSettings;
use crate::uow::in_transaction;
use crate::validator::OrderValidator;

/// What a call to [`SaleFinalizationHook::process_saved_sale`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizationOutcome {
    /// Saved as a draft; nothing finalized, nothing manufactured.
    SavedAsDraft,
    /// The sale is cancelled; it is never manufactured.
    Cancelled,
    /// The sale was finalized by an earlier call; no new orders.
    AlreadyFinalized,
    /// The sale was finalized now; confirmed orders in line order.
    Finalized { orders: Vec<ManufacturingOrderId> },
}

/// Wraps sale finalization: the draft → paid transition, then validation and
/// order creation, all in one unit of work.
pub struct SaleFinalizationHook<'a> {
    sales: &'a dyn SaleRepository,
    uow: &'a dyn UnitOfWork,
    validator: OrderValidator<'a>,
    sequencer: OrderCreationSequencer<'a>,
}

impl<'a> SaleFinalizationHook<'a> {
    pub fn new(ports: Ports<'a>, settings: &'a PosMrpSettings) -> Self {
        let checker =
            AvailabilityChecker::new(ports.products, ports.boms, ports.stock, ports.warehouses);
        let validator = OrderValidator::new(ports.products, ports.boms, checker);
        let builder = ManufacturingOrderBuilder::new(ports.warehouses, settings);
        let sequencer =
            OrderCreationSequencer::new(ports.products, ports.boms, ports.productions, builder);

        Self {
            sales: ports.sales,
            uow: ports.uow,
            validator,
            sequencer,
        }
    }

    /// Saves a sale coming back from the till.
    ///
    /// With `draft == false` a draft sale is finalized and its manufacturing
    /// orders are created. Any error rolls everything back, including the
    /// finalization itself.
    pub fn process_saved_sale(
        &self,
        tenant_id: TenantId,
        sale_id: SaleId,
        draft: bool,
    ) -> Result<FinalizationOutcome, PosMrpError> {
        in_transaction(self.uow, || self.finalize(tenant_id, sale_id, draft)).inspect_err(|err| {
            tracing::warn!(%sale_id, error = %err, "sale finalization aborted");
        })
    }

    fn finalize(
        &self,
        tenant_id: TenantId,
        sale_id: SaleId,
        draft: bool,
    ) -> Result<FinalizationOutcome, PosMrpError> {
        let mut sale = self
            .sales
            .load(tenant_id, sale_id)?
            .ok_or_else(|| PortError::NotFound(format!("sale {sale_id}")))?;

        if draft {
            return Ok(FinalizationOutcome::SavedAsDraft);
        }
        if sale.is_cancelled() {
            return Ok(FinalizationOutcome::Cancelled);
        }
        if !sale.is_draft() {
            tracing::debug!(sale = %sale.name(), "sale already finalized; skipping");
            return Ok(FinalizationOutcome::AlreadyFinalized);
        }

        let expected = ExpectedVersion::Exact(sale.version());
        execute(
            &mut sale,
            &SaleCommand::FinalizeSale(FinalizeSale {
                tenant_id,
                sale_id,
                occurred_at: Utc::now(),
            }),
        )?;
        self.sales.save(tenant_id, &sale, expected)?;

        let sales = std::slice::from_ref(&sale);
        let plan = self.validator.validate(tenant_id, sales)?;
        let orders = self.sequencer.create_from_plan(tenant_id, &plan)?;

        tracing::info!(
            sale = %sale.name(),
            orders = orders.len(),
            "sale finalized"
        );

        Ok(FinalizationOutcome::Finalized {
            orders: orders.iter().map(|mo| mo.id_typed()).collect(),
        })
    }
}
