//! Typed access to resource attributes and construction of state attributes

use azion_core::provider::{ProviderError, ProviderResult};
use azion_core::resource::{Attributes, Resource, ResourceId, Value};

use crate::utils::{int_list_value, ints_from_value, string_list_value, strings_from_value};

/// Read-only view over a resource's attributes (or one nested block)
#[derive(Clone, Copy)]
pub struct Attrs<'a> {
    id: &'a ResourceId,
    map: &'a Attributes,
}

impl<'a> Attrs<'a> {
    pub fn new(resource: &'a Resource) -> Self {
        Self {
            id: &resource.id,
            map: &resource.attributes,
        }
    }

    /// View over a nested block, reporting errors against the same resource
    pub fn nested(&self, map: &'a Attributes) -> Attrs<'a> {
        Attrs { id: self.id, map }
    }

    pub fn str(&self, key: &str) -> Option<String> {
        self.map.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn required_str(&self, key: &str) -> ProviderResult<String> {
        self.str(key).ok_or_else(|| self.missing(key))
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.map.get(key).and_then(Value::as_int)
    }

    pub fn required_int(&self, key: &str) -> ProviderResult<i64> {
        self.int(key).ok_or_else(|| self.missing(key))
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.map.get(key).and_then(Value::as_bool)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        self.map.get(key).map(|v| strings_from_value(Some(v)))
    }

    pub fn ints(&self, key: &str) -> Option<Vec<i64>> {
        self.map.get(key).map(|v| ints_from_value(Some(v)))
    }

    /// Nested block list (`List` of `Map`)
    pub fn blocks(&self, key: &str) -> Vec<Attrs<'a>> {
        self.map
            .get(key)
            .and_then(Value::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_map)
                    .map(|m| self.nested(m))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Single nested block
    pub fn block(&self, key: &str) -> Option<Attrs<'a>> {
        self.map
            .get(key)
            .and_then(Value::as_map)
            .map(|m| self.nested(m))
    }

    fn missing(&self, key: &str) -> ProviderError {
        ProviderError::new(format!("Attribute '{}' is required", key)).for_resource(self.id.clone())
    }
}

/// Builder for state attribute maps
#[derive(Debug, Default)]
pub struct AttrsBuilder {
    attrs: Attributes,
}

impl AttrsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn set_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    /// Set a string unless the API returned an empty one
    pub fn set_nonempty(self, key: &str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.set(key, value)
        }
    }

    pub fn strings(self, key: &str, items: &[String]) -> Self {
        self.set(key, string_list_value(items))
    }

    pub fn ints(self, key: &str, items: &[i64]) -> Self {
        self.set(key, int_list_value(items))
    }

    pub fn block(self, key: &str, block: Attributes) -> Self {
        self.set(key, Value::Map(block))
    }

    pub fn blocks(self, key: &str, blocks: Vec<Attributes>) -> Self {
        self.set(key, Value::List(blocks.into_iter().map(Value::Map).collect()))
    }

    pub fn build(self) -> Attributes {
        self.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_typed_values() {
        let address = AttrsBuilder::new()
            .set("address", "origin.example.com")
            .set("weight", 10_i64)
            .build();
        let resource = Resource::new("azion_edge_application_origin", "web")
            .with_attribute("name", "web")
            .with_attribute("hmac_authentication", true)
            .with_attribute(
                "addresses",
                Value::List(vec![Value::Map(address), Value::from("ignored")]),
            );

        let attrs = Attrs::new(&resource);
        assert_eq!(attrs.str("name").as_deref(), Some("web"));
        assert_eq!(attrs.bool("hmac_authentication"), Some(true));
        assert!(!attrs.bool_or("missing", false));
        assert_eq!(attrs.int("name"), None);

        let blocks = attrs.blocks("addresses");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].int("weight"), Some(10));
    }

    #[test]
    fn required_reports_resource() {
        let resource = Resource::new("azion_domain", "www");
        let err = Attrs::new(&resource).required_str("name").unwrap_err();
        assert_eq!(err.to_string(), "[azion_domain.www] Attribute 'name' is required");
    }

    #[test]
    fn builder_skips_empty() {
        let attrs = AttrsBuilder::new()
            .set_nonempty("description", "")
            .set_opt("weight", None::<i64>)
            .set_opt("ttl", Some(300_i64))
            .build();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs["ttl"], Value::Int(300));
    }
}
