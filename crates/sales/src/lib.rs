//! Point-of-sale orders (event-sourced).
//!
//! Business rules for POS sales: signed lines (refunds are negative) and the
//! draft → paid finalization transition. No IO.

pub mod sale;

pub use sale::{
    AddLine, CancelSale, CloseSale, CreateSale, FinalizeSale, LineAdded, Sale, SaleCancelled,
    SaleClosed, SaleCommand, SaleCreated, SaleEvent, SaleFinalized, SaleId, SaleLine, SaleStatus,
};
