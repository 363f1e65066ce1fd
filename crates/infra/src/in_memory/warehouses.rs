use posmrp_core::{DomainError, TenantId};
use posmrp_inventory::{Company, CompanyId, OperationType, Warehouse, WarehouseId};
use posmrp_workflow::{PortResult, WarehouseDirectory};

use super::{not_found, InMemoryBackend};
use crate::store::TenantStore;

impl InMemoryBackend {
    pub fn add_company(&self, tenant_id: TenantId, company: Company) -> PortResult<()> {
        self.companies.upsert(tenant_id, company.id, company)
    }

    /// Designate (or replace) the company's default warehouse.
    pub fn set_default_warehouse(
        &self,
        tenant_id: TenantId,
        company_id: CompanyId,
        warehouse_id: WarehouseId,
    ) -> PortResult<()> {
        let company = self
            .companies
            .get(tenant_id, &company_id)?
            .ok_or_else(|| not_found("company", company_id))?;
        self.add_company(tenant_id, company.with_default_warehouse(warehouse_id))
    }

    pub fn add_warehouse(&self, tenant_id: TenantId, warehouse: Warehouse) -> PortResult<()> {
        if self.companies.get(tenant_id, &warehouse.company_id)?.is_none() {
            return Err(not_found("company", warehouse.company_id));
        }
        let duplicate_code = self
            .warehouses
            .list(tenant_id)?
            .iter()
            .any(|w| w.company_id == warehouse.company_id && w.code == warehouse.code && w.id != warehouse.id);
        if duplicate_code {
            return Err(DomainError::conflict(format!(
                "warehouse code '{}' already used by this company",
                warehouse.code
            ))
            .into());
        }
        self.warehouses.upsert(tenant_id, warehouse.id, warehouse)
    }

    pub fn add_operation_type(
        &self,
        tenant_id: TenantId,
        operation_type: OperationType,
    ) -> PortResult<()> {
        if self.warehouses.get(tenant_id, &operation_type.warehouse_id)?.is_none() {
            return Err(not_found("warehouse", operation_type.warehouse_id));
        }
        self.operation_types
            .upsert(tenant_id, operation_type.id, operation_type)
    }

    pub(crate) fn warehouse(
        &self,
        tenant_id: TenantId,
        warehouse_id: WarehouseId,
    ) -> PortResult<Option<Warehouse>> {
        self.warehouses.get(tenant_id, &warehouse_id)
    }
}

impl WarehouseDirectory for InMemoryBackend {
    fn company(&self, tenant_id: TenantId, company_id: CompanyId) -> PortResult<Option<Company>> {
        self.companies.get(tenant_id, &company_id)
    }

    fn warehouses(&self, tenant_id: TenantId, company_id: CompanyId) -> PortResult<Vec<Warehouse>> {
        Ok(self
            .warehouses
            .list(tenant_id)?
            .into_iter()
            .filter(|w| w.company_id == company_id)
            .collect())
    }

    fn operation_types(
        &self,
        tenant_id: TenantId,
        warehouse_id: WarehouseId,
    ) -> PortResult<Vec<OperationType>> {
        Ok(self
            .operation_types
            .list(tenant_id)?
            .into_iter()
            .filter(|op| op.warehouse_id == warehouse_id)
            .collect())
    }
}
