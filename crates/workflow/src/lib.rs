//! POS → manufacturing workflow.
//!
//! When a sale finalizes, every positive line whose product is flagged
//! "manufacture on sale" is checked against its bill of materials and the
//! stock of the company warehouse, then one manufacturing order per line is
//! created and confirmed. Validation of the whole sale happens before any
//! order is created, and the whole run sits inside one unit of work.
//!
//! Every collaborator is an explicit port (see [`ports`]); adapters live in
//! `posmrp-infra`.

pub mod availability;
pub mod builder;
pub mod error;
pub mod hook;
pub mod messages;
pub mod ports;
pub mod selection;
pub mod sequencer;
pub mod settings;
pub mod uow;
pub mod validator;
pub mod warehouse;

pub use availability::AvailabilityChecker;
pub use builder::ManufacturingOrderBuilder;
pub use error::{PortError, PortResult, PosMrpError, Shortage};
pub use hook::{FinalizationOutcome, SaleFinalizationHook};
pub use ports::{
    BomService, ManufacturingOrderService, Ports, ProductCatalog, SaleRepository, StockService,
    UnitOfWork, WarehouseDirectory,
};
pub use sequencer::OrderCreationSequencer;
pub use settings::{Locale, PosMrpSettings};
pub use uow::in_transaction;
pub use validator::{OrderValidator, PlannedOrder, ValidatedPlan};
