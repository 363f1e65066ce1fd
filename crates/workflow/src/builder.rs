//! Field set of a manufacturing order created from a sale line.

use posmrp_core::TenantId;
use posmrp_manufacturing::{Bom, NewManufacturingOrder};
use posmrp_products::Product;
use posmrp_sales::{Sale, SaleLine};

use crate::error::PosMrpError;
use crate::ports::WarehouseDirectory;
use crate::settings::PosMrpSettings;
use crate::warehouse::{resolve_operation_type, resolve_warehouse, sale_company};

pub struct ManufacturingOrderBuilder<'a> {
    warehouses: &'a dyn WarehouseDirectory,
    settings: &'a PosMrpSettings,
}

impl<'a> ManufacturingOrderBuilder<'a> {
    pub fn new(warehouses: &'a dyn WarehouseDirectory, settings: &'a PosMrpSettings) -> Self {
        Self {
            warehouses,
            settings,
        }
    }

    /// A missing manufacturing operation type is not an error: the order is
    /// built with `operation_type_id: None`.
    pub fn build(
        &self,
        tenant_id: TenantId,
        sale: &Sale,
        line: &SaleLine,
        product: &Product,
        bom: &Bom,
    ) -> Result<NewManufacturingOrder, PosMrpError> {
        let company_id = sale_company(sale)?;
        let warehouse = resolve_warehouse(self.warehouses, tenant_id, company_id)?;
        let operation_type = resolve_operation_type(
            self.warehouses,
            tenant_id,
            warehouse.id,
            &self.settings.operation_type_code,
        )?;

        if operation_type.is_none() {
            tracing::debug!(
                warehouse = %warehouse.code,
                code = %self.settings.operation_type_code,
                "no manufacturing operation type; leaving it unset"
            );
        }

        Ok(NewManufacturingOrder {
            product_id: line.product_id,
            quantity: line.quantity,
            bom_id: bom.id,
            uom: line.uom.clone().unwrap_or_else(|| product.uom().clone()),
            company_id,
            warehouse_id: warehouse.id,
            origin: self.settings.origin_for(sale.name()),
            sale_id: sale.id_typed(),
            operation_type_id: operation_type.map(|op| op.id),
        })
    }
}
