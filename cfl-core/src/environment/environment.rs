use std::sync::Arc;

use tracing::trace;

use crate::eval::prelude::EvalErrorType;
use super::value::Value;

/// Persistent chain of bindings. Extending never touches an existing frame,
/// so an environment captured by a closure stays valid from any thread.
#[derive(Clone, Default)]
pub struct Environment {
    frame: Option<Arc<Frame>>,
}

struct Frame {
    name: String,
    value: Value,
    parent: Environment,
}

impl Environment {
    pub fn new() -> Self {
        Self { frame: None }
    }

    /// Innermost binding of `name` wins.
    pub fn lookup(&self, name: &str) -> Result<&Value, EvalErrorType> {
        let mut current = self.frame.as_deref();

        while let Some(frame) = current {
            if frame.name == name {
                trace!(name, "resolved");

                return Ok(&frame.value);
            }

            current = frame.parent.frame.as_deref();
        }

        Err(EvalErrorType::UnboundName { name: name.to_string() })
    }

    pub fn extend(&self, name: impl Into<String>, value: Value) -> Self {
        Self {
            frame: Some(Arc::new(Frame {
                name: name.into(),
                value,
                parent: self.clone(),
            }))
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.frame, &other.frame) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Bound names, innermost first. Shadowed names appear once per frame.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![];
        let mut current = self.frame.as_deref();

        while let Some(frame) = current {
            names.push(frame.name.as_str());
            current = frame.parent.frame.as_deref();
        }

        names
    }
}

impl FromIterator<(String, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |env, (name, value)| env.extend(name, value))
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

// long chains would otherwise be released recursively
impl Drop for Environment {
    fn drop(&mut self) {
        let mut frame = self.frame.take();

        while let Some(shared) = frame {
            match Arc::try_unwrap(shared) {
                Ok(mut owned) => frame = owned.parent.frame.take(),
                Err(_) => break,
            }
        }
    }
}
