//! Workflow settings.
//!
//! Defaults match the stock setup; `posmrp-infra::config` overrides them from
//! the environment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use posmrp_inventory::MRP_OPERATION_CODE;

/// Language of user-facing error messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            other => Err(format!("unsupported locale '{other}' (expected: en, ar)")),
        }
    }
}

/// Placeholder replaced by the sale display name in `origin_template`.
pub const SALE_PLACEHOLDER: &str = "{sale}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosMrpSettings {
    /// Operation-type code used to find the warehouse's manufacturing type.
    pub operation_type_code: String,
    /// Origin label of created orders; must contain `{sale}`.
    pub origin_template: String,
    pub locale: Locale,
}

impl Default for PosMrpSettings {
    fn default() -> Self {
        Self {
            operation_type_code: MRP_OPERATION_CODE.to_string(),
            origin_template: format!("POS: {SALE_PLACEHOLDER}"),
            locale: Locale::default(),
        }
    }
}

impl PosMrpSettings {
    /// Origin label for a sale, e.g. "POS: Shop/0001".
    pub fn origin_for(&self, sale_name: &str) -> String {
        self.origin_template.replace(SALE_PLACEHOLDER, sale_name)
    }
}
