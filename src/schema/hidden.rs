//! Hidden input extraction

use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// Input name reserved for the entry-id namespace; never a hidden field
const RESERVED_NAME: &str = "entry";

/// Collects `<input type="hidden" name=... value=...>` pairs from a page
///
/// The type attribute is matched case-insensitively, as browsers do, so
/// `type="HIDDEN"` counts. Inputs without a name, with an empty value, or
/// named `entry` are skipped. A later duplicate name wins.
pub fn extract_hidden_fields(html: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(html);
    let mut fields = BTreeMap::new();

    let Ok(selector) = Selector::parse(r#"input[type="hidden"]"#) else {
        return fields;
    };

    for element in document.select(&selector) {
        let (Some(name), Some(value)) = (element.value().attr("name"), element.value().attr("value"))
        else {
            continue;
        };

        if name.is_empty() || value.is_empty() || name == RESERVED_NAME {
            continue;
        }

        fields.insert(name.to_string(), value.to_string());
    }

    fields
}
