use crate::numeric::NumericModule;
use crate::value::Value;
use std::collections::HashMap;

/// The only names an equation can see.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    values: HashMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Namespace holding just the numeric module under `ident`.
    pub fn with_numeric_module(ident: &str) -> Self {
        let mut namespace = Self::new();
        namespace.insert(ident, Value::Module(NumericModule));
        namespace
    }

    /// Binds `name`, returning the value it shadowed.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
