use chrono::Utc;
use rust_decimal::Decimal;

use posmrp_core::TenantId;
use posmrp_inventory::{AdjustStock, LocationId, ReserveStock, StockCommand, StockLevel, StockLevelId};
use posmrp_products::ProductId;
use posmrp_workflow::{PortResult, StockService};

use super::{dispatch, InMemoryBackend};
use crate::store::TenantStore;

impl InMemoryBackend {
    /// Inventory adjustment (receipt when positive, consumption when negative).
    pub fn adjust_stock(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        location_id: LocationId,
        delta: Decimal,
    ) -> PortResult<StockLevel> {
        let level_id = StockLevelId::new(product_id, location_id);
        dispatch(
            &self.stock,
            tenant_id,
            level_id,
            StockLevel::empty,
            &StockCommand::AdjustStock(AdjustStock {
                tenant_id,
                level_id,
                delta,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub(crate) fn reserve_stock(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        location_id: LocationId,
        quantity: Decimal,
    ) -> PortResult<StockLevel> {
        let level_id = StockLevelId::new(product_id, location_id);
        dispatch(
            &self.stock,
            tenant_id,
            level_id,
            StockLevel::empty,
            &StockCommand::ReserveStock(ReserveStock {
                tenant_id,
                level_id,
                quantity,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Current level; an untouched product/location pair is empty.
    pub fn stock_level(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        location_id: LocationId,
    ) -> PortResult<StockLevel> {
        let level_id = StockLevelId::new(product_id, location_id);
        Ok(self
            .stock
            .get(tenant_id, &level_id)?
            .unwrap_or_else(|| StockLevel::empty(level_id)))
    }
}

impl StockService for InMemoryBackend {
    fn quantity_on_hand(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        location_id: LocationId,
    ) -> PortResult<Decimal> {
        Ok(self.stock_level(tenant_id, product_id, location_id)?.on_hand())
    }
}
