use chrono::Utc;
use rust_decimal::Decimal;

use posmrp_core::{AggregateRoot, ExpectedVersion, TenantId};
use posmrp_inventory::CompanyId;
use posmrp_products::{ProductId, UnitOfMeasure};
use posmrp_sales::{AddLine, CancelSale, CreateSale, Sale, SaleCommand, SaleId};
use posmrp_workflow::{PortResult, SaleRepository};

use super::{dispatch, not_found, InMemoryBackend};
use crate::store::TenantStore;

impl InMemoryBackend {
    /// Open a draft sale for a company.
    pub fn open_sale(
        &self,
        tenant_id: TenantId,
        company_id: CompanyId,
        name: &str,
    ) -> PortResult<Sale> {
        if self.companies.get(tenant_id, &company_id)?.is_none() {
            return Err(not_found("company", company_id));
        }
        let sale_id = SaleId::generate();
        dispatch(
            &self.sales,
            tenant_id,
            sale_id,
            Sale::empty,
            &SaleCommand::CreateSale(CreateSale {
                tenant_id,
                sale_id,
                company_id,
                name: name.to_string(),
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Add a line; negative quantities are refunds. `uom` defaults to the
    /// product's unit downstream.
    pub fn add_line(
        &self,
        tenant_id: TenantId,
        sale_id: SaleId,
        product_id: ProductId,
        quantity: Decimal,
        uom: Option<UnitOfMeasure>,
    ) -> PortResult<Sale> {
        if self.sales.get(tenant_id, &sale_id)?.is_none() {
            return Err(not_found("sale", sale_id));
        }
        if self.products.get(tenant_id, &product_id)?.is_none() {
            return Err(not_found("product", product_id));
        }
        dispatch(
            &self.sales,
            tenant_id,
            sale_id,
            Sale::empty,
            &SaleCommand::AddLine(AddLine {
                tenant_id,
                sale_id,
                product_id,
                quantity,
                uom,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn cancel_sale(&self, tenant_id: TenantId, sale_id: SaleId) -> PortResult<Sale> {
        if self.sales.get(tenant_id, &sale_id)?.is_none() {
            return Err(not_found("sale", sale_id));
        }
        dispatch(
            &self.sales,
            tenant_id,
            sale_id,
            Sale::empty,
            &SaleCommand::CancelSale(CancelSale {
                tenant_id,
                sale_id,
                occurred_at: Utc::now(),
            }),
        )
    }
}

impl SaleRepository for InMemoryBackend {
    fn load(&self, tenant_id: TenantId, sale_id: SaleId) -> PortResult<Option<Sale>> {
        self.sales.get(tenant_id, &sale_id)
    }

    fn save(&self, tenant_id: TenantId, sale: &Sale, expected: ExpectedVersion) -> PortResult<()> {
        let sale_id = sale.id_typed();
        let current = self
            .sales
            .get(tenant_id, &sale_id)?
            .map(|s| s.version())
            .unwrap_or(0);
        expected.check(current)?;
        self.sales.upsert(tenant_id, sale_id, sale.clone())
    }
}
