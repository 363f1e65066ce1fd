//! Inventory module: companies, warehouses, manufacturing operation types and
//! per-location stock levels.

pub mod stock;
pub mod warehouse;

pub use stock::{
    AdjustStock, ReserveStock, StockAdjusted, StockCommand, StockEvent, StockLevel, StockLevelId,
    StockReserved,
};
pub use warehouse::{
    Company, CompanyId, LocationId, OperationType, OperationTypeId, Warehouse, WarehouseId,
    MRP_OPERATION_CODE,
};
