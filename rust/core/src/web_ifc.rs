// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of web-ifc property responses.
//!
//! web-ifc returns entities as JSON objects whose attribute values are
//! wrapped as `{ "type": <tag>, "value": <v> }`. Property sets and type
//! objects are expected in their recursive form, with nested entities
//! inlined rather than given as references.

use crate::error::LookupError;
use crate::properties::{Attributes, PropertySet, TypeObject};
use serde_json::{Map, Value};

/// Attributes of a single property that may carry its value
const PROPERTY_VALUE_FIELDS: [&str; 5] = [
    "NominalValue",
    "EnumerationValues",
    "ListValues",
    "UpperBoundValue",
    "LowerBoundValue",
];

/// Attributes of a physical quantity that may carry its value
const QUANTITY_VALUE_FIELDS: [&str; 6] = [
    "LengthValue",
    "AreaValue",
    "VolumeValue",
    "CountValue",
    "WeightValue",
    "TimeValue",
];

/// Direct attributes of an entity, in response order
pub fn item_attributes(value: &Value) -> Result<Attributes, LookupError> {
    let object = expect_object(value, "item properties")?;
    Ok(object
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect())
}

/// Property sets and quantity sets of an element
pub fn property_sets(value: &Value) -> Result<Vec<PropertySet>, LookupError> {
    let sets = expect_array(value, "property sets")?;
    Ok(sets.iter().filter_map(property_set).collect())
}

/// Type objects of an element with their property sets
pub fn type_objects(value: &Value) -> Result<Vec<TypeObject>, LookupError> {
    let types = expect_array(value, "type properties")?;
    Ok(types
        .iter()
        .filter_map(Value::as_object)
        .map(|object| TypeObject {
            name: object.get("Name").and_then(label),
            property_sets: object
                .get("HasPropertySets")
                .and_then(Value::as_array)
                .map(|sets| sets.iter().filter_map(property_set).collect())
                .unwrap_or_default(),
        })
        .collect())
}

/// Decode one IfcPropertySet or IfcElementQuantity.
///
/// Returns `None` for anything that is not an inlined set, such as an
/// unresolved reference.
pub fn property_set(value: &Value) -> Option<PropertySet> {
    let object = value.as_object()?;
    let name = object.get("Name").and_then(label);

    let (members, value_fields): (&Vec<Value>, &[&str]) =
        if let Some(props) = object.get("HasProperties").and_then(Value::as_array) {
            (props, &PROPERTY_VALUE_FIELDS[..])
        } else if let Some(quantities) = object.get("Quantities").and_then(Value::as_array) {
            (quantities, &QUANTITY_VALUE_FIELDS[..])
        } else {
            return None;
        };

    let properties = members
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|member| {
            let name = member.get("Name").and_then(label)?;
            let value = value_fields
                .iter()
                .find_map(|field| member.get(*field).filter(|v| !v.is_null()))
                .cloned()
                .unwrap_or(Value::Null);
            Some((name, value))
        })
        .collect();

    Some(PropertySet { name, properties })
}

/// Text of a wrapped label such as `{"type": 1, "value": "Pset_WallCommon"}`
pub fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(object) => object.get("value").and_then(label),
        _ => None,
    }
}

fn expect_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, LookupError> {
    value.as_object().ok_or_else(|| {
        LookupError::MalformedResponse(format!("{what}: expected an object, got {}", kind(value)))
    })
}

fn expect_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, LookupError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(LookupError::MalformedResponse(format!(
            "{what}: expected an array, got {}",
            kind(value)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
