use chrono::Utc;

use posmrp_core::TenantId;
use posmrp_products::{
    CreateProduct, Product, ProductCommand, ProductId, SetManufactureOnSale, UnitOfMeasure,
};
use posmrp_workflow::{PortError, PortResult, ProductCatalog};

use super::{dispatch, InMemoryBackend};
use crate::store::TenantStore;

impl InMemoryBackend {
    /// Register a product. Non-empty SKUs must be unique per tenant.
    pub fn create_product(
        &self,
        tenant_id: TenantId,
        sku: &str,
        name: &str,
        uom: UnitOfMeasure,
    ) -> PortResult<Product> {
        let sku = sku.trim();
        if !sku.is_empty()
            && self
                .products
                .list(tenant_id)?
                .iter()
                .any(|p| p.sku() == sku)
        {
            return Err(PortError::Domain(posmrp_core::DomainError::conflict(format!(
                "SKU '{sku}' is already used"
            ))));
        }

        let product_id = ProductId::generate();
        dispatch(
            &self.products,
            tenant_id,
            product_id,
            Product::empty,
            &ProductCommand::CreateProduct(CreateProduct {
                tenant_id,
                product_id,
                sku: sku.to_string(),
                name: name.to_string(),
                uom,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Administrator switch for the manufacture-on-sale flag.
    pub fn set_manufacture_on_sale(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        enabled: bool,
    ) -> PortResult<Product> {
        dispatch(
            &self.products,
            tenant_id,
            product_id,
            Product::empty,
            &ProductCommand::SetManufactureOnSale(SetManufactureOnSale {
                tenant_id,
                product_id,
                enabled,
                occurred_at: Utc::now(),
            }),
        )
    }
}

impl ProductCatalog for InMemoryBackend {
    fn product(&self, tenant_id: TenantId, product_id: ProductId) -> PortResult<Option<Product>> {
        self.products.get(tenant_id, &product_id)
    }
}
