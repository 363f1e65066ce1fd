//! Product catalog module (event-sourced).
//!
//! Holds the product definition and the "manufacture on sale" flag read by the
//! POS → manufacturing workflow. Pure domain logic, no IO.

pub mod product;
pub mod uom;

pub use product::{
    CreateProduct, ManufactureOnSaleChanged, Product, ProductCommand, ProductCreated,
    ProductEvent, ProductId, SetManufactureOnSale,
};
pub use uom::UnitOfMeasure;
