//! Entity trait for plain configuration records (companies, warehouses,
//! operation types, bills of materials) that are not event-sourced.

pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
