// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element property lookup and flattening.
//!
//! An element's properties come in three parts: its direct attributes, the
//! property sets attached to it, and the property sets of its type object.
//! [`PropertyResolver`] fetches all three and flattens them into one
//! [`PropertyBag`] for display.

use crate::error::LookupError;
use crate::model::{ElementRef, ModelId};
use rustc_hash::FxHashSet;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Keys that hold structure rather than displayable values
pub const STRUCTURAL_KEYS: [&str; 3] = ["psets", "mats", "type"];

/// Ordered name/value pairs as returned by a property source
pub type Attributes = Vec<(String, Value)>;

/// A named group of properties (IfcPropertySet / IfcElementQuantity)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    pub name: Option<String>,
    pub properties: Attributes,
}

/// Type object of an element with its own property sets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeObject {
    pub name: Option<String>,
    pub property_sets: Vec<PropertySet>,
}

/// Read access to the IFC data of loaded models.
#[allow(async_fn_in_trait)]
pub trait PropertySource {
    fn is_loaded(&self, model_id: ModelId) -> bool;

    /// Direct attributes of the element
    async fn item_properties(&self, element: ElementRef) -> Result<Attributes, LookupError>;

    async fn property_sets(&self, element: ElementRef) -> Result<Vec<PropertySet>, LookupError>;

    async fn type_properties(&self, element: ElementRef) -> Result<Vec<TypeObject>, LookupError>;
}

/// Flat, ordered property listing of one element.
///
/// Keys are unique and never one of [`STRUCTURAL_KEYS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, Value)>,
}

impl PropertyBag {
    /// Flatten attributes, property sets and type property sets, in that order.
    ///
    /// Set properties are keyed `"<set name>.<property name>"`. The first
    /// occurrence of a key wins, so instance values shadow type values.
    pub fn flatten(
        attributes: Attributes,
        property_sets: &[PropertySet],
        types: &[TypeObject],
    ) -> Self {
        let mut builder = BagBuilder::default();

        for (name, value) in attributes {
            builder.insert(name, value);
        }

        let type_sets = types.iter().flat_map(|t| t.property_sets.iter());
        for set in property_sets.iter().chain(type_sets) {
            for (name, value) in &set.properties {
                let key = match &set.name {
                    Some(set_name) => format!("{set_name}.{name}"),
                    None => name.clone(),
                };
                builder.insert(key, value.clone());
            }
        }

        builder.finish()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PropertyBag {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Default)]
struct BagBuilder {
    seen: FxHashSet<String>,
    entries: Vec<(String, Value)>,
}

impl BagBuilder {
    fn insert(&mut self, key: String, value: Value) {
        if STRUCTURAL_KEYS.contains(&key.as_str()) || self.seen.contains(&key) {
            return;
        }
        self.seen.insert(key.clone());
        self.entries.push((key, value));
    }

    fn finish(self) -> PropertyBag {
        PropertyBag {
            entries: self.entries,
        }
    }
}

/// Resolves the flattened properties of an element.
#[derive(Debug, Clone, Default)]
pub struct PropertyResolver<S> {
    source: S,
}

impl<S: PropertySource> PropertyResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch and flatten the properties of `element`.
    ///
    /// Fails with [`LookupError::ModelNotLoaded`] if the element's model is
    /// not loaded.
    pub async fn resolve(&self, element: ElementRef) -> Result<PropertyBag, LookupError> {
        if !self.source.is_loaded(element.model_id) {
            return Err(LookupError::ModelNotLoaded(element.model_id));
        }

        let (attributes, property_sets, types) = futures_util::future::try_join3(
            self.source.item_properties(element),
            self.source.property_sets(element),
            self.source.type_properties(element),
        )
        .await?;

        let bag = PropertyBag::flatten(attributes, &property_sets, &types);
        tracing::debug!(%element, properties = bag.len(), "Resolved element properties");
        Ok(bag)
    }
}
