use serde::{Deserialize, Serialize};

use posmrp_core::{DomainError, ValueObject};

/// Unit of measure, identified by its display name ("Units", "kg", "L").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitOfMeasure(String);

impl UnitOfMeasure {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("unit of measure name cannot be empty"));
        }
        Ok(Self(name))
    }

    /// The default "Units" unit.
    pub fn units() -> Self {
        Self("Units".to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for UnitOfMeasure {
    fn default() -> Self {
        Self::units()
    }
}

impl core::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for UnitOfMeasure {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(UnitOfMeasure::new("  ").is_err());
    }

    #[test]
    fn displays_its_name() {
        assert_eq!(UnitOfMeasure::new("kg").unwrap().to_string(), "kg");
    }
}
