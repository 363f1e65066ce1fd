use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posmrp_core::{Aggregate, AggregateRoot, DomainError, TenantId};
use posmrp_events::Event;
use posmrp_inventory::{CompanyId, OperationTypeId, WarehouseId};
use posmrp_products::{ProductId, UnitOfMeasure};
use posmrp_sales::SaleId;

use crate::bom::BomId;

posmrp_core::domain_id!(
    /// Manufacturing order identifier.
    ManufacturingOrderId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductionStatus {
    Draft,
    Confirmed,
}

/// Field set of a manufacturing order about to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewManufacturingOrder {
    pub product_id: ProductId,
    pub quantity: Decimal,
    pub bom_id: BomId,
    pub uom: UnitOfMeasure,
    pub company_id: CompanyId,
    /// Warehouse whose stock location supplies the components.
    pub warehouse_id: WarehouseId,
    /// Traceability label, e.g. "POS: Shop/0001".
    pub origin: String,
    /// Sale that caused this order.
    pub sale_id: SaleId,
    /// `None` lets the manufacturing service pick its default.
    pub operation_type_id: Option<OperationTypeId>,
}

/// Aggregate root: ManufacturingOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturingOrder {
    id: ManufacturingOrderId,
    tenant_id: Option<TenantId>,
    values: Option<NewManufacturingOrder>,
    status: ProductionStatus,
    version: u64,
}

impl ManufacturingOrder {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: ManufacturingOrderId) -> Self {
        Self {
            id,
            tenant_id: None,
            values: None,
            status: ProductionStatus::Draft,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ManufacturingOrderId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn status(&self) -> ProductionStatus {
        self.status
    }

    pub fn is_created(&self) -> bool {
        self.values.is_some()
    }

    /// Order fields; `None` until created.
    pub fn values(&self) -> Option<&NewManufacturingOrder> {
        self.values.as_ref()
    }

    pub fn sale_id(&self) -> Option<SaleId> {
        self.values.as_ref().map(|v| v.sale_id)
    }
}

impl AggregateRoot for ManufacturingOrder {
    type Id = ManufacturingOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateProduction (creates the order in draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduction {
    pub tenant_id: TenantId,
    pub production_id: ManufacturingOrderId,
    pub values: NewManufacturingOrder,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmProduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmProduction {
    pub tenant_id: TenantId,
    pub production_id: ManufacturingOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionCommand {
    CreateProduction(CreateProduction),
    ConfirmProduction(ConfirmProduction),
}

/// Event: ProductionCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCreated {
    pub tenant_id: TenantId,
    pub production_id: ManufacturingOrderId,
    pub values: NewManufacturingOrder,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductionConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionConfirmed {
    pub tenant_id: TenantId,
    pub production_id: ManufacturingOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductionEvent {
    ProductionCreated(ProductionCreated),
    ProductionConfirmed(ProductionConfirmed),
}

impl Event for ProductionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductionEvent::ProductionCreated(_) => "manufacturing.production.created",
            ProductionEvent::ProductionConfirmed(_) => "manufacturing.production.confirmed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductionEvent::ProductionCreated(e) => e.occurred_at,
            ProductionEvent::ProductionConfirmed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ManufacturingOrder {
    type Command = ProductionCommand;
    type Event = ProductionEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductionEvent::ProductionCreated(e) => {
                self.id = e.production_id;
                self.tenant_id = Some(e.tenant_id);
                self.values = Some(e.values.clone());
                self.status = ProductionStatus::Draft;
            }
            ProductionEvent::ProductionConfirmed(_) => {
                self.status = ProductionStatus::Confirmed;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            ProductionCommand::CreateProduction(cmd) => self.handle_create(cmd),
            ProductionCommand::ConfirmProduction(cmd) => self.handle_confirm(cmd),
        }
    }
}

impl ManufacturingOrder {
    fn handle_create(&self, cmd: &CreateProduction) -> Result<Vec<ProductionEvent>, DomainError> {
        if self.is_created() {
            return Err(DomainError::conflict("manufacturing order already exists"));
        }
        if cmd.values.quantity <= Decimal::ZERO {
            return Err(DomainError::validation(
                "manufacturing order quantity must be positive",
            ));
        }

        Ok(vec![ProductionEvent::ProductionCreated(ProductionCreated {
            tenant_id: cmd.tenant_id,
            production_id: cmd.production_id,
            values: cmd.values.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm(
        &self,
        cmd: &ConfirmProduction,
    ) -> Result<Vec<ProductionEvent>, DomainError> {
        if !self.is_created() {
            return Err(DomainError::not_found());
        }
        if self.tenant_id != Some(cmd.tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        if self.id != cmd.production_id {
            return Err(DomainError::invariant("production_id mismatch"));
        }
        if self.status != ProductionStatus::Draft {
            return Err(DomainError::invariant(
                "only draft manufacturing orders can be confirmed",
            ));
        }

        Ok(vec![ProductionEvent::ProductionConfirmed(ProductionConfirmed {
            tenant_id: cmd.tenant_id,
            production_id: cmd.production_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
