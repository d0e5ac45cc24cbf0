// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property panel rendering.

use crate::properties::PropertyBag;
use serde_json::{Map, Value};

/// Text shown for null or absent values
pub const UNDEFINED: &str = "undefined";

/// Metadata keys allowed next to `value` in a wrapped scalar
const WRAPPER_TAGS: [&str; 3] = ["type", "label", "valueType"];

/// Key/value list view of the selected element's properties.
pub trait PropertyPanel {
    /// Remove every displayed row
    fn clear(&mut self);

    /// Append one row
    fn push_row(&mut self, key: &str, value: &str);

    /// Replace the panel content with `bag`
    fn render(&mut self, bag: PropertyBag) {
        self.clear();
        for (key, value) in bag {
            self.push_row(&key, &display_value(&value));
        }
    }
}

/// Display text of a property value.
///
/// Wrapped scalars (`{"type": 1, "value": "Wall"}`) show their inner value,
/// null shows [`UNDEFINED`], arrays are comma separated.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => UNDEFINED.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(object) => match wrapped_scalar(object) {
            Some(inner) => display_value(inner),
            None => value.to_string(),
        },
    }
}

fn wrapped_scalar(object: &Map<String, Value>) -> Option<&Value> {
    let inner = object.get("value")?;
    let only_tags = object
        .keys()
        .all(|key| key == "value" || WRAPPER_TAGS.contains(&key.as_str()));
    only_tags.then_some(inner)
}
