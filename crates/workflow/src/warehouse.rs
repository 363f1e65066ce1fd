//! Company warehouse resolution.

use posmrp_core::{DomainError, TenantId};
use posmrp_inventory::{CompanyId, OperationType, Warehouse, WarehouseId};
use posmrp_sales::Sale;

use crate::error::PosMrpError;
use crate::ports::WarehouseDirectory;

/// The company's designated default warehouse when it owns it, otherwise the
/// warehouse with the lowest (sequence, code).
pub fn resolve_warehouse(
    directory: &dyn WarehouseDirectory,
    tenant_id: TenantId,
    company_id: CompanyId,
) -> Result<Warehouse, PosMrpError> {
    let company = directory.company(tenant_id, company_id)?;
    let mut warehouses = directory.warehouses(tenant_id, company_id)?;

    if warehouses.is_empty() {
        let company = company
            .map(|c| c.name)
            .unwrap_or_else(|| company_id.to_string());
        return Err(PosMrpError::MissingWarehouse { company });
    }

    if let Some(default_id) = company.and_then(|c| c.default_warehouse_id) {
        if let Some(pos) = warehouses.iter().position(|w| w.id == default_id) {
            return Ok(warehouses.swap_remove(pos));
        }
        tracing::debug!(
            %company_id,
            warehouse_id = %default_id,
            "default warehouse not owned by company; falling back to sequence order"
        );
    }

    warehouses.sort_by(|a, b| (a.sequence, &a.code).cmp(&(b.sequence, &b.code)));
    Ok(warehouses.swap_remove(0))
}

/// Manufacturing operation type of a warehouse, if configured.
pub fn resolve_operation_type(
    directory: &dyn WarehouseDirectory,
    tenant_id: TenantId,
    warehouse_id: WarehouseId,
    code: &str,
) -> Result<Option<OperationType>, PosMrpError> {
    Ok(directory
        .operation_types(tenant_id, warehouse_id)?
        .into_iter()
        .find(|op| op.has_code(code)))
}

pub(crate) fn sale_company(sale: &Sale) -> Result<CompanyId, PosMrpError> {
    sale.company_id()
        .ok_or_else(|| DomainError::invariant(format!("sale {} has no company", sale.name())).into())
}
