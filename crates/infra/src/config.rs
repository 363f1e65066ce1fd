//! Environment-driven workflow settings.
//!
//! | variable                     | default          |
//! |------------------------------|------------------|
//! | `POSMRP_OPERATION_TYPE_CODE` | `mrp_operation`  |
//! | `POSMRP_ORIGIN_TEMPLATE`     | `POS: {sale}`    |
//! | `POSMRP_LOCALE`              | `en`             |

use thiserror::Error;

use posmrp_workflow::settings::SALE_PLACEHOLDER;
use posmrp_workflow::{Locale, PosMrpSettings};

pub const OPERATION_TYPE_CODE_VAR: &str = "POSMRP_OPERATION_TYPE_CODE";
pub const ORIGIN_TEMPLATE_VAR: &str = "POSMRP_ORIGIN_TEMPLATE";
pub const LOCALE_VAR: &str = "POSMRP_LOCALE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },

    #[error("POSMRP_ORIGIN_TEMPLATE must contain '{{sale}}', got '{0}'")]
    OriginTemplate(String),

    #[error("POSMRP_LOCALE: {0}")]
    Locale(String),
}

/// Settings from the process environment.
pub fn load_settings() -> Result<PosMrpSettings, ConfigError> {
    load_settings_from(|var| std::env::var(var).ok())
}

/// Settings from an arbitrary variable lookup; unset variables keep defaults.
pub fn load_settings_from<F>(lookup: F) -> Result<PosMrpSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = PosMrpSettings::default();

    if let Some(code) = lookup(OPERATION_TYPE_CODE_VAR) {
        let code = code.trim();
        if code.is_empty() {
            return Err(ConfigError::Empty {
                var: OPERATION_TYPE_CODE_VAR,
            });
        }
        settings.operation_type_code = code.to_string();
    }

    if let Some(template) = lookup(ORIGIN_TEMPLATE_VAR) {
        if !template.contains(SALE_PLACEHOLDER) {
            return Err(ConfigError::OriginTemplate(template));
        }
        settings.origin_template = template;
    }

    if let Some(locale) = lookup(LOCALE_VAR) {
        settings.locale = locale.parse::<Locale>().map_err(ConfigError::Locale)?;
    }

    tracing::debug!(
        operation_type_code = %settings.operation_type_code,
        origin_template = %settings.origin_template,
        locale = ?settings.locale,
        "workflow settings loaded"
    );
    Ok(settings)
}
