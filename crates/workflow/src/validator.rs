//! Pre-creation validation of every qualifying line.

use posmrp_core::TenantId;
use posmrp_manufacturing::{Bom, BomType};
use posmrp_products::Product;
use posmrp_sales::{Sale, SaleLine};

use crate::availability::AvailabilityChecker;
use crate::error::PosMrpError;
use crate::ports::{BomService, ProductCatalog};
use crate::selection::manufacturable_lines;
use crate::warehouse::sale_company;

/// A line that passed validation, with the BoM it was validated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOrder {
    pub sale: Sale,
    pub line: SaleLine,
    pub product: Product,
    pub bom: Bom,
}

/// Result of a successful validation, in sale then line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPlan {
    orders: Vec<PlannedOrder>,
}

impl ValidatedPlan {
    pub fn orders(&self) -> &[PlannedOrder] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

pub struct OrderValidator<'a> {
    products: &'a dyn ProductCatalog,
    boms: &'a dyn BomService,
    checker: AvailabilityChecker<'a>,
}

impl<'a> OrderValidator<'a> {
    pub fn new(
        products: &'a dyn ProductCatalog,
        boms: &'a dyn BomService,
        checker: AvailabilityChecker<'a>,
    ) -> Self {
        Self {
            products,
            boms,
            checker,
        }
    }

    /// Validate every flagged, positive line of `sales`.
    ///
    /// The first failure aborts the whole batch: nothing is returned for the
    /// lines that passed before it.
    pub fn validate(&self, tenant_id: TenantId, sales: &[Sale]) -> Result<ValidatedPlan, PosMrpError> {
        let mut plan = ValidatedPlan::default();

        for sale in sales {
            let company_id = sale_company(sale)?;
            for (line, product) in manufacturable_lines(self.products, tenant_id, sale)? {
                let bom = self
                    .boms
                    .find_bom(tenant_id, line.product_id, BomType::Normal, company_id)?
                    .ok_or_else(|| PosMrpError::MissingBom {
                        product: product.display_name(),
                    })?;

                self.checker.check(tenant_id, sale, &line, &product, &bom)?;

                plan.orders.push(PlannedOrder {
                    sale: sale.clone(),
                    line,
                    product,
                    bom,
                });
            }
        }

        Ok(plan)
    }
}
