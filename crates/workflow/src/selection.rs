//! Which sale lines produce manufacturing orders.

use rust_decimal::Decimal;

use posmrp_core::TenantId;
use posmrp_products::Product;
use posmrp_sales::{Sale, SaleLine};

use crate::error::PortResult;
use crate::ports::{require_product, ProductCatalog};

/// Lines of `sale`, in stored order, whose product is flagged for
/// manufacture on sale and whose quantity is strictly positive.
///
/// Refund and zero lines are dropped before the product is even looked up.
pub fn manufacturable_lines(
    catalog: &dyn ProductCatalog,
    tenant_id: TenantId,
    sale: &Sale,
) -> PortResult<Vec<(SaleLine, Product)>> {
    let mut selected = Vec::new();
    for line in sale.lines() {
        if line.quantity <= Decimal::ZERO {
            continue;
        }
        let product = require_product(catalog, tenant_id, line.product_id)?;
        if line.is_manufacturable(&product) {
            selected.push((line.clone(), product));
        }
    }
    Ok(selected)
}
