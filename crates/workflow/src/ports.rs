//! Ports: everything the workflow reads from or writes to.
//!
//! Adapters implement these traits; components receive them explicitly
//! through their constructors.

use rust_decimal::Decimal;

use posmrp_core::{ExpectedVersion, TenantId};
use posmrp_inventory::{Company, CompanyId, LocationId, OperationType, Warehouse, WarehouseId};
use posmrp_manufacturing::{
    Bom, BomType, ComponentRequirement, ManufacturingOrder, ManufacturingOrderId,
    NewManufacturingOrder,
};
use posmrp_products::{Product, ProductId};
use posmrp_sales::{Sale, SaleId};

use crate::error::{PortError, PortResult};

pub trait ProductCatalog: Send + Sync {
    fn product(&self, tenant_id: TenantId, product_id: ProductId) -> PortResult<Option<Product>>;
}

pub trait BomService: Send + Sync {
    /// Best BoM of `bom_type` for the product, usable by `company_id`.
    fn find_bom(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        bom_type: BomType,
        company_id: CompanyId,
    ) -> PortResult<Option<Bom>>;

    /// Components (with quantities and units) needed for `quantity` units.
    fn explode(
        &self,
        tenant_id: TenantId,
        bom: &Bom,
        quantity: Decimal,
    ) -> PortResult<Vec<ComponentRequirement>>;
}

pub trait StockService: Send + Sync {
    /// Physical quantity of a product at a location.
    fn quantity_on_hand(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        location_id: LocationId,
    ) -> PortResult<Decimal>;
}

pub trait WarehouseDirectory: Send + Sync {
    fn company(&self, tenant_id: TenantId, company_id: CompanyId) -> PortResult<Option<Company>>;

    /// Every warehouse owned by the company, in no particular order.
    fn warehouses(&self, tenant_id: TenantId, company_id: CompanyId) -> PortResult<Vec<Warehouse>>;

    fn operation_types(
        &self,
        tenant_id: TenantId,
        warehouse_id: WarehouseId,
    ) -> PortResult<Vec<OperationType>>;
}

pub trait ManufacturingOrderService: Send + Sync {
    /// Create a manufacturing order in draft.
    fn create(
        &self,
        tenant_id: TenantId,
        values: NewManufacturingOrder,
    ) -> PortResult<ManufacturingOrder>;

    /// Confirm a draft order and reserve its components.
    fn confirm(
        &self,
        tenant_id: TenantId,
        production_id: ManufacturingOrderId,
    ) -> PortResult<ManufacturingOrder>;

    /// Orders whose back-reference points at `sale_id`, in creation order.
    fn orders_for_sale(
        &self,
        tenant_id: TenantId,
        sale_id: SaleId,
    ) -> PortResult<Vec<ManufacturingOrder>>;
}

pub trait SaleRepository: Send + Sync {
    fn load(&self, tenant_id: TenantId, sale_id: SaleId) -> PortResult<Option<Sale>>;

    fn save(&self, tenant_id: TenantId, sale: &Sale, expected: ExpectedVersion) -> PortResult<()>;
}

/// Explicit transaction boundary around one finalization.
pub trait UnitOfWork: Send + Sync {
    fn begin(&self) -> PortResult<()>;
    fn commit(&self) -> PortResult<()>;
    /// Discards every write since `begin`.
    fn rollback(&self) -> PortResult<()>;
}

/// All ports needed by the finalization hook.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub products: &'a dyn ProductCatalog,
    pub boms: &'a dyn BomService,
    pub stock: &'a dyn StockService,
    pub warehouses: &'a dyn WarehouseDirectory,
    pub productions: &'a dyn ManufacturingOrderService,
    pub sales: &'a dyn SaleRepository,
    pub uow: &'a dyn UnitOfWork,
}

pub(crate) fn require_product(
    catalog: &dyn ProductCatalog,
    tenant_id: TenantId,
    product_id: ProductId,
) -> PortResult<Product> {
    catalog
        .product(tenant_id, product_id)?
        .ok_or_else(|| PortError::NotFound(format!("product {product_id}")))
}
