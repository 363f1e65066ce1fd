//! Domain events and the in-process command execution helper.

pub mod event;
pub mod handler;

pub use event::Event;
pub use handler::execute;
