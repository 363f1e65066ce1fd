//! In-memory adapters for every workflow port.
//!
//! One [`InMemoryBackend`] plays the whole host system: product catalog, BoM
//! service, stock ledger, warehouse directory, manufacturing, sales and the
//! unit of work. Intended for tests, demos and embedding; not optimized.

mod boms;
mod catalog;
mod productions;
mod sales;
mod stock;
mod warehouses;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use posmrp_core::{Aggregate, DomainError, TenantId};
use posmrp_events::{execute, Event};
use posmrp_inventory::{
    Company, CompanyId, OperationType, OperationTypeId, StockLevel, StockLevelId, Warehouse,
    WarehouseId,
};
use posmrp_manufacturing::{Bom, BomId, ManufacturingOrder, ManufacturingOrderId};
use posmrp_products::{Product, ProductId};
use posmrp_sales::{Sale, SaleId};
use posmrp_workflow::{PortError, PortResult, Ports, UnitOfWork};

use crate::store::{InMemoryTenantStore, TenantStore};

/// A record plus its insertion sequence (stable creation order).
#[derive(Debug, Clone)]
pub(crate) struct Stored<T> {
    pub seq: u64,
    pub record: T,
}

type Entries<K, V> = HashMap<(TenantId, K), V>;

struct Snapshot {
    products: Entries<ProductId, Product>,
    boms: Entries<BomId, Stored<Bom>>,
    stock: Entries<StockLevelId, StockLevel>,
    companies: Entries<CompanyId, Company>,
    warehouses: Entries<WarehouseId, Warehouse>,
    operation_types: Entries<OperationTypeId, OperationType>,
    productions: Entries<ManufacturingOrderId, Stored<ManufacturingOrder>>,
    sales: Entries<SaleId, Sale>,
}

#[derive(Default)]
pub struct InMemoryBackend {
    products: InMemoryTenantStore<ProductId, Product>,
    boms: InMemoryTenantStore<BomId, Stored<Bom>>,
    stock: InMemoryTenantStore<StockLevelId, StockLevel>,
    companies: InMemoryTenantStore<CompanyId, Company>,
    warehouses: InMemoryTenantStore<WarehouseId, Warehouse>,
    operation_types: InMemoryTenantStore<OperationTypeId, OperationType>,
    productions: InMemoryTenantStore<ManufacturingOrderId, Stored<ManufacturingOrder>>,
    sales: InMemoryTenantStore<SaleId, Sale>,
    sequence: AtomicU64,
    active_tx: Mutex<Option<Snapshot>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every port backed by this instance.
    pub fn ports(&self) -> Ports<'_> {
        Ports {
            products: self,
            boms: self,
            stock: self,
            warehouses: self,
            productions: self,
            sales: self,
            uow: self,
        }
    }

    /// True while a unit of work is open.
    pub fn in_transaction(&self) -> PortResult<bool> {
        Ok(self.lock_tx()?.is_some())
    }

    pub(crate) fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn lock_tx(&self) -> PortResult<std::sync::MutexGuard<'_, Option<Snapshot>>> {
        self.active_tx
            .lock()
            .map_err(|_| PortError::Transaction("transaction lock poisoned".to_string()))
    }

    fn snapshot(&self) -> PortResult<Snapshot> {
        Ok(Snapshot {
            products: self.products.snapshot()?,
            boms: self.boms.snapshot()?,
            stock: self.stock.snapshot()?,
            companies: self.companies.snapshot()?,
            warehouses: self.warehouses.snapshot()?,
            operation_types: self.operation_types.snapshot()?,
            productions: self.productions.snapshot()?,
            sales: self.sales.snapshot()?,
        })
    }

    fn restore(&self, snap: Snapshot) -> PortResult<()> {
        self.products.restore(snap.products)?;
        self.boms.restore(snap.boms)?;
        self.stock.restore(snap.stock)?;
        self.companies.restore(snap.companies)?;
        self.warehouses.restore(snap.warehouses)?;
        self.operation_types.restore(snap.operation_types)?;
        self.productions.restore(snap.productions)?;
        self.sales.restore(snap.sales)
    }
}

impl UnitOfWork for InMemoryBackend {
    fn begin(&self) -> PortResult<()> {
        let mut tx = self.lock_tx()?;
        if tx.is_some() {
            return Err(PortError::Transaction(
                "a unit of work is already in progress".to_string(),
            ));
        }
        *tx = Some(self.snapshot()?);
        tracing::trace!("unit of work started");
        Ok(())
    }

    fn commit(&self) -> PortResult<()> {
        let mut tx = self.lock_tx()?;
        if tx.take().is_none() {
            return Err(PortError::Transaction("commit without begin".to_string()));
        }
        tracing::trace!("unit of work committed");
        Ok(())
    }

    fn rollback(&self) -> PortResult<()> {
        let mut tx = self.lock_tx()?;
        let snap = tx
            .take()
            .ok_or_else(|| PortError::Transaction("rollback without begin".to_string()))?;
        self.restore(snap)?;
        tracing::debug!("unit of work rolled back");
        Ok(())
    }
}

/// Load-or-empty, execute one command, store the result.
pub(crate) fn dispatch<A>(
    store: &InMemoryTenantStore<A::Id, A>,
    tenant_id: TenantId,
    key: A::Id,
    empty: impl FnOnce(A::Id) -> A,
    command: &A::Command,
) -> PortResult<A>
where
    A: Aggregate<Error = DomainError> + Clone + Send + Sync + 'static,
    A::Id: Send + Sync + 'static,
    A::Event: Event,
{
    let mut aggregate = match store.get(tenant_id, &key)? {
        Some(existing) => existing,
        None => empty(key.clone()),
    };
    for event in execute(&mut aggregate, command)? {
        tracing::trace!(
            %tenant_id,
            event_type = event.event_type(),
            event_version = event.version(),
            occurred_at = %event.occurred_at(),
            "event applied"
        );
    }
    store.upsert(tenant_id, key, aggregate.clone())?;
    Ok(aggregate)
}

pub(crate) fn not_found(what: &str, id: impl core::fmt::Display) -> PortError {
    PortError::NotFound(format!("{what} {id}"))
}
