use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::parser::prelude::{escape, is_bare_key, Lambda};
use super::environment::Environment;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer {
        value: i64
    },
    Float {
        value: f64,
    },
    String {
        value: String,
    },
    Boolean {
        value: bool
    },
    List {
        items: Arc<Vec<Value>>
    },
    Map {
        map: Map
    },
    Closure {
        closure: Closure
    },
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Integer { .. } | Self::Float { .. } => ValueType::Number,
            Self::String { .. } => ValueType::String,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::List { .. } => ValueType::List,
            Self::Map { .. } => ValueType::Map,
            Self::Closure { .. } => ValueType::Closure,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String { value } => Some(value),
            _ => None,
        }
    }

    /// Text spliced into a template for scalars, `None` for everything else.
    pub fn as_interpolated(&self) -> Option<String> {
        match self {
            Self::String { value } => Some(value.clone()),
            Self::Integer { value } => Some(value.to_string()),
            Self::Float { value } => Some(format!("{value:?}")),
            Self::Boolean { value } => Some(value.to_string()),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer { value } => write!(f, "{value}"),
            Value::Float { value } => write!(f, "{value:?}"),
            Value::String { value } => write!(f, "\"{}\"", escape(value)),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::List { items } => {
                let items = items.iter()
                    .map(|item| item.to_string())
                    .collect::<Vec<String>>();

                write!(f, "[{}]", items.join(", "))
            },
            Value::Map { map } => write!(f, "{map}"),
            Value::Closure { closure } => write!(f, "{}", closure.lambda),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer { value }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float { value }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean { value }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String { value: value.to_string() }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String { value }
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List { items: Arc::new(items) }
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map { map }
    }
}

/// String-keyed map that keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Arc<Vec<(String, Value)>>,
}

impl Map {
    /// Fails with the first key that appears twice.
    pub fn new(entries: Vec<(String, Value)>) -> Result<Self, String> {
        let mut seen = HashSet::with_capacity(entries.len());

        for (key, _) in &entries {
            if !seen.insert(key.as_str()) {
                return Err(key.clone());
            }
        }

        Ok(Self { entries: Arc::new(entries) })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Display for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.iter()
            .map(|(key, value)| match is_bare_key(key) {
                true => format!("{key}: {value}"),
                false => format!("\"{}\": {value}", escape(key)),
            })
            .collect::<Vec<String>>();

        write!(f, "{{{}}}", entries.join(", "))
    }
}

#[derive(Debug, Clone)]
pub struct Closure {
    pub lambda: Arc<Lambda>,
    pub env: Environment,
}

// same lambda node captured in the same scope
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lambda, &other.lambda) && self.env.ptr_eq(&other.env)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    String,
    Boolean,
    List,
    Map,
    Closure,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Closure => "closure",
        };

        write!(f, "{name}")
    }
}
