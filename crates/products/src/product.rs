use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posmrp_core::{Aggregate, AggregateRoot, DomainError, TenantId};
use posmrp_events::Event;

use crate::uom::UnitOfMeasure;

posmrp_core::domain_id!(
    /// Product identifier (tenant-scoped via `tenant_id` fields in events/commands).
    ProductId
);

/// Aggregate root: Product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    tenant_id: Option<TenantId>,
    sku: String,
    name: String,
    uom: UnitOfMeasure,
    manufacture_on_sale: bool,
    version: u64,
    created: bool,
}

impl Product {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: ProductId) -> Self {
        Self {
            id,
            tenant_id: None,
            sku: String::new(),
            name: String::new(),
            uom: UnitOfMeasure::default(),
            manufacture_on_sale: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default unit of measure, used when a sale line carries none.
    pub fn uom(&self) -> &UnitOfMeasure {
        &self.uom
    }

    /// Whether a positive sale of this product triggers a manufacturing order.
    pub fn manufacture_on_sale(&self) -> bool {
        self.manufacture_on_sale
    }

    /// `"[SKU] Name"`, or just the name when no SKU is set.
    pub fn display_name(&self) -> String {
        if self.sku.is_empty() {
            self.name.clone()
        } else {
            format!("[{}] {}", self.sku, self.name)
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }
}

impl AggregateRoot for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub uom: UnitOfMeasure,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetManufactureOnSale (administrator configuration).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetManufactureOnSale {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub enabled: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductCommand {
    CreateProduct(CreateProduct),
    SetManufactureOnSale(SetManufactureOnSale),
}

/// Event: ProductCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub sku: String,
    pub name: String,
    pub uom: UnitOfMeasure,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ManufactureOnSaleChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufactureOnSaleChanged {
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub enabled: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductEvent {
    ProductCreated(ProductCreated),
    ManufactureOnSaleChanged(ManufactureOnSaleChanged),
}

impl Event for ProductEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::ProductCreated(_) => "products.product.created",
            ProductEvent::ManufactureOnSaleChanged(_) => {
                "products.product.manufacture_on_sale_changed"
            }
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductEvent::ProductCreated(e) => e.occurred_at,
            ProductEvent::ManufactureOnSaleChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Product {
    type Command = ProductCommand;
    type Event = ProductEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductEvent::ProductCreated(e) => {
                self.id = e.product_id;
                self.tenant_id = Some(e.tenant_id);
                self.sku = e.sku.clone();
                self.name = e.name.clone();
                self.uom = e.uom.clone();
                self.manufacture_on_sale = false;
                self.created = true;
            }
            ProductEvent::ManufactureOnSaleChanged(e) => {
                self.manufacture_on_sale = e.enabled;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductCommand::CreateProduct(cmd) => self.handle_create(cmd),
            ProductCommand::SetManufactureOnSale(cmd) => self.handle_set_flag(cmd),
        }
    }
}

impl Product {
    fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        Ok(())
    }

    fn ensure_product_id(&self, product_id: ProductId) -> Result<(), DomainError> {
        if self.id != product_id {
            return Err(DomainError::invariant("product_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateProduct) -> Result<Vec<ProductEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("product already exists"));
        }

        if cmd.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        // SKU is optional; uniqueness is the catalog adapter's concern.
        Ok(vec![ProductEvent::ProductCreated(ProductCreated {
            tenant_id: cmd.tenant_id,
            product_id: cmd.product_id,
            sku: cmd.sku.trim().to_string(),
            name: cmd.name.clone(),
            uom: cmd.uom.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_flag(
        &self,
        cmd: &SetManufactureOnSale,
    ) -> Result<Vec<ProductEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_product_id(cmd.product_id)?;

        if self.manufacture_on_sale == cmd.enabled {
            return Ok(vec![]);
        }

        Ok(vec![ProductEvent::ManufactureOnSaleChanged(
            ManufactureOnSaleChanged {
                tenant_id: cmd.tenant_id,
                product_id: cmd.product_id,
                enabled: cmd.enabled,
                occurred_at: cmd.occurred_at,
            },
        )])
    }
}
