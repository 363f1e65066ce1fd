//! Warehouse directory records.
//!
//! These are configuration entities maintained by an administrator; they are
//! not event-sourced.

use serde::{Deserialize, Serialize};

use posmrp_core::{DomainError, Entity};

posmrp_core::domain_id!(
    /// Company (legal entity) identifier.
    CompanyId
);
posmrp_core::domain_id!(WarehouseId);
posmrp_core::domain_id!(
    /// Internal stock location identifier.
    LocationId
);
posmrp_core::domain_id!(OperationTypeId);

/// Operation-type code of manufacturing operations.
pub const MRP_OPERATION_CODE: &str = "mrp_operation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Warehouse designated as the company default, if any.
    pub default_warehouse_id: Option<WarehouseId>,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("company name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            default_warehouse_id: None,
        })
    }

    pub fn with_default_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.default_warehouse_id = Some(warehouse_id);
        self
    }
}

impl Entity for Company {
    type Id = CompanyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A warehouse owned by one company, with its main stock location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub company_id: CompanyId,
    /// Short code, e.g. "WH".
    pub code: String,
    pub name: String,
    /// Location raw materials are stored in.
    pub stock_location_id: LocationId,
    /// Lower sorts first.
    pub sequence: u32,
}

impl Warehouse {
    pub fn new(
        id: WarehouseId,
        company_id: CompanyId,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::validation("warehouse code cannot be empty"));
        }
        Ok(Self {
            id,
            company_id,
            code,
            name: name.into(),
            stock_location_id: LocationId::generate(),
            sequence: 10,
        })
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

impl Entity for Warehouse {
    type Id = WarehouseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Operation type scoped to a warehouse (receipts, deliveries, manufacturing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationType {
    pub id: OperationTypeId,
    pub warehouse_id: WarehouseId,
    pub code: String,
    pub name: String,
}

impl OperationType {
    /// Manufacturing operation type for a warehouse.
    pub fn manufacturing(warehouse_id: WarehouseId) -> Self {
        Self {
            id: OperationTypeId::generate(),
            warehouse_id,
            code: MRP_OPERATION_CODE.to_string(),
            name: "Manufacturing".to_string(),
        }
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code == code
    }
}

impl Entity for OperationType {
    type Id = OperationTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_requires_a_name() {
        assert!(Company::new(CompanyId::generate(), "").is_err());
    }

    #[test]
    fn warehouse_gets_its_own_stock_location() {
        let company = CompanyId::generate();
        let a = Warehouse::new(WarehouseId::generate(), company, "WH", "Main").unwrap();
        let b = Warehouse::new(WarehouseId::generate(), company, "WH2", "Back").unwrap();
        assert_ne!(a.stock_location_id, b.stock_location_id);
    }

    #[test]
    fn manufacturing_operation_type_uses_mrp_code() {
        let op = OperationType::manufacturing(WarehouseId::generate());
        assert!(op.has_code(MRP_OPERATION_CODE));
        assert!(!op.has_code("incoming"));
    }
}
