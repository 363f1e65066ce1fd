use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use posmrp_core::{Aggregate, AggregateRoot, DomainError, TenantId};
use posmrp_events::Event;
use posmrp_products::ProductId;

use crate::warehouse::LocationId;

/// Stock level identity: one product at one location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockLevelId {
    pub product_id: ProductId,
    pub location_id: LocationId,
}

impl StockLevelId {
    pub fn new(product_id: ProductId, location_id: LocationId) -> Self {
        Self {
            product_id,
            location_id,
        }
    }
}

/// Aggregate root: StockLevel.
///
/// Levels exist implicitly at zero; the first applied event binds the tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    id: StockLevelId,
    tenant_id: Option<TenantId>,
    on_hand: Decimal,
    reserved: Decimal,
    version: u64,
}

impl StockLevel {
    pub fn empty(id: StockLevelId) -> Self {
        Self {
            id,
            tenant_id: None,
            on_hand: Decimal::ZERO,
            reserved: Decimal::ZERO,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> StockLevelId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Physical quantity at the location, reservations included.
    pub fn on_hand(&self) -> Decimal {
        self.on_hand
    }

    /// Quantity promised to confirmed manufacturing orders.
    pub fn reserved(&self) -> Decimal {
        self.reserved
    }

    /// On hand minus reserved; negative when over-reserved.
    pub fn free(&self) -> Decimal {
        self.on_hand - self.reserved
    }
}

impl AggregateRoot for StockLevel {
    type Id = StockLevelId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AdjustStock (inventory count, receipt, consumption).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub tenant_id: TenantId,
    pub level_id: StockLevelId,
    pub delta: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReserveStock (issued when a manufacturing order is confirmed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveStock {
    pub tenant_id: TenantId,
    pub level_id: StockLevelId,
    pub quantity: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    AdjustStock(AdjustStock),
    ReserveStock(ReserveStock),
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub tenant_id: TenantId,
    pub level_id: StockLevelId,
    pub delta: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockReserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReserved {
    pub tenant_id: TenantId,
    pub level_id: StockLevelId,
    pub quantity: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockEvent {
    StockAdjusted(StockAdjusted),
    StockReserved(StockReserved),
}

impl Event for StockEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockEvent::StockAdjusted(_) => "inventory.stock.adjusted",
            StockEvent::StockReserved(_) => "inventory.stock.reserved",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::StockAdjusted(e) => e.occurred_at,
            StockEvent::StockReserved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockLevel {
    type Command = StockCommand;
    type Event = StockEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockEvent::StockAdjusted(e) => {
                self.tenant_id.get_or_insert(e.tenant_id);
                self.on_hand += e.delta;
            }
            StockEvent::StockReserved(e) => {
                self.tenant_id.get_or_insert(e.tenant_id);
                self.reserved += e.quantity;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
            StockCommand::ReserveStock(cmd) => self.handle_reserve(cmd),
        }
    }
}

impl StockLevel {
    fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        match self.tenant_id {
            Some(t) if t != tenant_id => Err(DomainError::invariant("tenant mismatch")),
            _ => Ok(()),
        }
    }

    fn ensure_level_id(&self, level_id: StockLevelId) -> Result<(), DomainError> {
        if self.id != level_id {
            return Err(DomainError::invariant("stock level id mismatch"));
        }
        Ok(())
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_level_id(cmd.level_id)?;

        if cmd.delta.is_zero() {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        if self.on_hand + cmd.delta < Decimal::ZERO {
            return Err(DomainError::invariant("stock cannot go negative"));
        }

        Ok(vec![StockEvent::StockAdjusted(StockAdjusted {
            tenant_id: cmd.tenant_id,
            level_id: cmd.level_id,
            delta: cmd.delta,
            occurred_at: cmd.occurred_at,
        })])
    }

    // Over-reservation is allowed: availability is checked before confirmation,
    // and the reservation itself never blocks.
    fn handle_reserve(&self, cmd: &ReserveStock) -> Result<Vec<StockEvent>, DomainError> {
        self.ensure_tenant(cmd.tenant_id)?;
        self.ensure_level_id(cmd.level_id)?;

        if cmd.quantity <= Decimal::ZERO {
            return Err(DomainError::validation("reserved quantity must be positive"));
        }

        Ok(vec![StockEvent::StockReserved(StockReserved {
            tenant_id: cmd.tenant_id,
            level_id: cmd.level_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }
}
