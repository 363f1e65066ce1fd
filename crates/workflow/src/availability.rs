//! Component availability check for one sale line.

use posmrp_core::TenantId;
use posmrp_manufacturing::Bom;
use posmrp_products::Product;
use posmrp_sales::{Sale, SaleLine};

use crate::error::{PosMrpError, Shortage};
use crate::ports::{require_product, BomService, ProductCatalog, StockService, WarehouseDirectory};
use crate::warehouse::{resolve_warehouse, sale_company};

/// Compares exploded BoM requirements against on-hand stock at the company
/// warehouse's stock location. Read-only.
pub struct AvailabilityChecker<'a> {
    products: &'a dyn ProductCatalog,
    boms: &'a dyn BomService,
    stock: &'a dyn StockService,
    warehouses: &'a dyn WarehouseDirectory,
}

impl<'a> AvailabilityChecker<'a> {
    pub fn new(
        products: &'a dyn ProductCatalog,
        boms: &'a dyn BomService,
        stock: &'a dyn StockService,
        warehouses: &'a dyn WarehouseDirectory,
    ) -> Self {
        Self {
            products,
            boms,
            stock,
            warehouses,
        }
    }

    /// Fails with [`PosMrpError::InsufficientStock`] listing every short
    /// component, or [`PosMrpError::MissingWarehouse`].
    pub fn check(
        &self,
        tenant_id: TenantId,
        sale: &Sale,
        line: &SaleLine,
        product: &Product,
        bom: &Bom,
    ) -> Result<(), PosMrpError> {
        let warehouse = resolve_warehouse(self.warehouses, tenant_id, sale_company(sale)?)?;
        let location_id = warehouse.stock_location_id;

        let requirements = self.boms.explode(tenant_id, bom, line.quantity)?;

        let mut shortages = Vec::new();
        for req in requirements {
            let available = self
                .stock
                .quantity_on_hand(tenant_id, req.product_id, location_id)?;
            if available < req.quantity {
                let component = require_product(self.products, tenant_id, req.product_id)?;
                shortages.push(Shortage {
                    product: component.display_name(),
                    required: req.quantity,
                    available,
                    shortage: req.quantity - available,
                    uom: req.uom.name().to_string(),
                });
            }
        }

        if shortages.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            sale = %sale.name(),
            line_no = line.line_no,
            short_components = shortages.len(),
            warehouse = %warehouse.code,
            "insufficient components"
        );

        Err(PosMrpError::InsufficientStock {
            product: product.display_name(),
            shortages,
        })
    }
}
