//! Creation and confirmation of manufacturing orders.

use posmrp_core::TenantId;
use posmrp_manufacturing::{Bom, BomType, ManufacturingOrder};
use posmrp_products::Product;
use posmrp_sales::{Sale, SaleLine};

use crate::builder::ManufacturingOrderBuilder;
use crate::error::PosMrpError;
use crate::ports::{BomService, ManufacturingOrderService, ProductCatalog};
use crate::selection::manufacturable_lines;
use crate::validator::ValidatedPlan;
use crate::warehouse::sale_company;

/// Creates one draft order per qualifying line and confirms it straight away.
///
/// Never rolls back: a failure half-way leaves earlier orders in place for the
/// caller's transaction to discard.
pub struct OrderCreationSequencer<'a> {
    products: &'a dyn ProductCatalog,
    boms: &'a dyn BomService,
    productions: &'a dyn ManufacturingOrderService,
    builder: ManufacturingOrderBuilder<'a>,
}

impl<'a> OrderCreationSequencer<'a> {
    pub fn new(
        products: &'a dyn ProductCatalog,
        boms: &'a dyn BomService,
        productions: &'a dyn ManufacturingOrderService,
        builder: ManufacturingOrderBuilder<'a>,
    ) -> Self {
        Self {
            products,
            boms,
            productions,
            builder,
        }
    }

    /// Re-resolves each line's BoM; lines without one are skipped, since
    /// validation is expected to have run first. Stock is not re-checked.
    pub fn create_manufacturing_orders(
        &self,
        tenant_id: TenantId,
        sales: &[Sale],
    ) -> Result<Vec<ManufacturingOrder>, PosMrpError> {
        let mut created = Vec::new();

        for sale in sales {
            let company_id = sale_company(sale)?;
            for (line, product) in manufacturable_lines(self.products, tenant_id, sale)? {
                let bom =
                    self.boms
                        .find_bom(tenant_id, line.product_id, BomType::Normal, company_id)?;
                let Some(bom) = bom else {
                    tracing::debug!(
                        sale = %sale.name(),
                        line_no = line.line_no,
                        "no BoM at creation time; line skipped"
                    );
                    continue;
                };
                created.push(self.create_one(tenant_id, sale, &line, &product, &bom)?);
            }
        }

        Ok(created)
    }

    /// Creates the orders of a validated plan using the BoMs it was validated
    /// against.
    pub fn create_from_plan(
        &self,
        tenant_id: TenantId,
        plan: &ValidatedPlan,
    ) -> Result<Vec<ManufacturingOrder>, PosMrpError> {
        plan.orders()
            .iter()
            .map(|p| self.create_one(tenant_id, &p.sale, &p.line, &p.product, &p.bom))
            .collect()
    }

    fn create_one(
        &self,
        tenant_id: TenantId,
        sale: &Sale,
        line: &SaleLine,
        product: &Product,
        bom: &Bom,
    ) -> Result<ManufacturingOrder, PosMrpError> {
        let values = self.builder.build(tenant_id, sale, line, product, bom)?;
        let draft = self.productions.create(tenant_id, values)?;
        let confirmed = self.productions.confirm(tenant_id, draft.id_typed())?;

        tracing::info!(
            sale = %sale.name(),
            line_no = line.line_no,
            production_id = %confirmed.id_typed(),
            quantity = %line.quantity,
            "manufacturing order confirmed"
        );

        Ok(confirmed)
    }
}
