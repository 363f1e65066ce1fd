//! Manufacturing module: bills of materials and manufacturing orders.
//!
//! Manufacturing orders carry a back-reference to the sale that caused them.

pub mod bom;
pub mod production;

pub use bom::{explode, Bom, BomId, BomLine, BomType, ComponentRequirement};
pub use production::{
    ConfirmProduction, CreateProduction, ManufacturingOrder, ManufacturingOrderId,
    NewManufacturingOrder, ProductionCommand, ProductionConfirmed, ProductionCreated,
    ProductionEvent, ProductionStatus,
};
