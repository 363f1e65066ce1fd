//! Workflow error model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use posmrp_core::{DomainError, ValueObject};

use crate::messages;

pub type PortResult<T> = Result<T, PortError>;

/// Failure reported by an adapter behind a port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortError {
    /// A referenced record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The backing store could not be read or written.
    #[error("storage failure: {0}")]
    Storage(String),

    /// begin/commit/rollback misuse or failure.
    #[error("transaction failure: {0}")]
    Transaction(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One component that is short for a manufacturing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortage {
    /// Component display name.
    pub product: String,
    pub required: Decimal,
    pub available: Decimal,
    /// `required - available`, always positive.
    pub shortage: Decimal,
    /// Unit name of the BoM line.
    pub uom: String,
}

impl ValueObject for Shortage {}

/// Errors that block a sale from being finalized.
///
/// Every variant is user-facing: the cashier sees the rendered message and the
/// finalization is rolled back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PosMrpError {
    /// A flagged, positive line has no bill of materials.
    #[error("{}", messages::missing_bom(.product, crate::Locale::En))]
    MissingBom { product: String },

    /// One or more components lack on-hand stock; lists all of them.
    #[error("{}", messages::insufficient_stock(.product, .shortages, crate::Locale::En))]
    InsufficientStock {
        product: String,
        shortages: Vec<Shortage>,
    },

    /// The sale's company has no warehouse.
    #[error("{}", messages::missing_warehouse(.company, crate::Locale::En))]
    MissingWarehouse { company: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Port(#[from] PortError),
}

