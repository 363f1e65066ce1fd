//! User-facing message rendering (English and Arabic).

use crate::error::{PosMrpError, Shortage};
use crate::settings::Locale;

/// Text shown to the cashier for `err`.
pub fn render(err: &PosMrpError, locale: Locale) -> String {
    match err {
        PosMrpError::MissingBom { product } => missing_bom(product, locale),
        PosMrpError::InsufficientStock { product, shortages } => {
            insufficient_stock(product, shortages, locale)
        }
        PosMrpError::MissingWarehouse { company } => missing_warehouse(company, locale),
        PosMrpError::Domain(e) => e.to_string(),
        PosMrpError::Port(e) => e.to_string(),
    }
}

pub(crate) fn missing_bom(product: &str, locale: Locale) -> String {
    match locale {
        Locale::En => format!(
            "Cannot process order: Product '{product}' requires manufacturing but has no valid Bill of Materials."
        ),
        Locale::Ar => format!(
            "لا يمكن معالجة الطلب: المنتج '{product}' يتطلب التصنيع ولكن ليس له قائمة مواد صالحة."
        ),
    }
}

pub(crate) fn missing_warehouse(company: &str, locale: Locale) -> String {
    match locale {
        Locale::En => format!("No warehouse found for company '{company}'."),
        Locale::Ar => format!("لم يتم العثور على مستودع لشركة '{company}'."),
    }
}

pub(crate) fn insufficient_stock(product: &str, shortages: &[Shortage], locale: Locale) -> String {
    let items = shortages
        .iter()
        .map(|s| shortage_line(s, locale))
        .collect::<Vec<_>>()
        .join("\n");

    match locale {
        Locale::En => format!(
            "Cannot manufacture product '{product}'.\n\nNot enough quantity of:\n{items}"
        ),
        Locale::Ar => format!("لايمكن تصنيع المنتج '{product}'.\n\nلعدم وجود كمية كافية من\n{items}"),
    }
}

fn shortage_line(s: &Shortage, locale: Locale) -> String {
    match locale {
        Locale::En => format!(
            "  • {}: requires {:.2} {uom}, available {:.2} {uom} (shortage: {:.2})",
            s.product,
            s.required,
            s.available,
            s.shortage,
            uom = s.uom,
        ),
        Locale::Ar => format!(
            "  • {}: يتطلب {:.2} {uom}, المتاح {:.2} {uom} (النقص: {:.2})",
            s.product,
            s.required,
            s.available,
            s.shortage,
            uom = s.uom,
        ),
    }
}
