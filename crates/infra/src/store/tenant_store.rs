use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use posmrp_core::TenantId;
use posmrp_workflow::{PortError, PortResult};

/// Tenant-isolated key/value store.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> PortResult<Option<V>>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V) -> PortResult<()>;
    fn list(&self, tenant_id: TenantId) -> PortResult<Vec<V>>;
}

type Entries<K, V> = HashMap<(TenantId, K), V>;

/// In-memory tenant-isolated store.
///
/// Supports whole-store snapshots so a unit of work can roll back.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<Entries<K, V>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> PortError {
    PortError::Storage("lock poisoned".to_string())
}

impl<K, V> InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Copy of every entry, all tenants included.
    pub fn snapshot(&self) -> PortResult<Entries<K, V>> {
        Ok(self.inner.read().map_err(|_| poisoned())?.clone())
    }

    /// Replace the whole content with a previous snapshot.
    pub fn restore(&self, entries: Entries<K, V>) -> PortResult<()> {
        *self.inner.write().map_err(|_| poisoned())? = entries;
        Ok(())
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> PortResult<Option<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&(tenant_id, key.clone())).cloned())
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) -> PortResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert((tenant_id, key), value);
        Ok(())
    }

    fn list(&self, tenant_id: TenantId) -> PortResult<Vec<V>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map
            .iter()
            .filter_map(|((t, _k), v)| if *t == tenant_id { Some(v.clone()) } else { None })
            .collect())
    }
}
