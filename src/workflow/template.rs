//! Message template interpolation.
//!
//! Message bodies may reference contact fields and record context values via
//! `{{name}}` tokens. Tokens are resolved against the contact's fields
//! first, then the record context; a token that matches neither is left
//! literal so a typo never blocks a send.

use regex::Regex;
use serde_json::Value;

use crate::{collab::Contact, common::Vars};

/// Token pattern: `{{name}}` or `{{ name }}` with dotted paths.
const TOKEN_PATTERN: &str = r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}";

/// Render `template`, substituting `{{name}}` tokens.
pub fn render(
    template: &str,
    contact: &Contact,
    context: &Vars,
) -> String {
    let re = Regex::new(TOKEN_PATTERN).unwrap();
    let mut result = template.to_string();

    for caps in re.captures_iter(template) {
        let full_match = &caps[0];
        let key_path = &caps[1];

        match lookup(key_path, contact, context) {
            Some(value) => {
                result = result.replace(full_match, &value);
            }
            None => {
                tracing::debug!("template token '{}' unresolved for contact {}", key_path, contact.id);
            }
        }
    }

    result
}

/// Resolve a dotted key path against contact fields, then context.
fn lookup(
    key_path: &str,
    contact: &Contact,
    context: &Vars,
) -> Option<String> {
    let mut keys = key_path.split('.');
    let first = keys.next()?;

    let root = if first == "phone" {
        Some(Value::String(contact.phone.clone()))
    } else {
        contact.fields.get_value(first).cloned().or_else(|| context.get_value(first).cloned())
    };

    let mut current = root?;
    for key in keys {
        current = current.get(key)?.clone();
    }

    match current {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        v => Some(v.to_string()),
    }
}
