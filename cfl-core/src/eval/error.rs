use thiserror::Error;

use crate::{environment::prelude::ValueType, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalErrorType {
    #[error("`{name}` is not bound")]
    UnboundName { name: String },
    #[error("a {found} cannot be called")]
    NotCallable { found: ValueType },
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("key `{key}` is defined more than once")]
    DuplicateKey { key: String },
    #[error("no key `{key}`")]
    MissingKey { key: String },
    #[error("index {index} is out of bounds for a list of length {length}")]
    Index { index: i64, length: usize },
    #[error("a {receiver} has no method `{name}`")]
    NoSuchMethod { name: String, receiver: ValueType },
    #[error("a {found} cannot be interpolated into a string")]
    InterpolationType { found: ValueType },
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: ValueType },
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: usize },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error} at {span}")]
pub struct EvalError {
    pub error: EvalErrorType,
    pub span: SrcSpan
}

impl EvalError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            EvalErrorType::UnboundName { name } => (
                format!("`{name}` is not bound"),
                vec![format!("Bind it with `let {name} = ...` or pass it as an argument")],
            ),
            EvalErrorType::NotCallable { found } => (
                format!("This is a {found}, not a function"),
                vec![],
            ),
            EvalErrorType::Arity { expected, got } => (
                format!("Expected {expected} arguments, got {got}"),
                vec![],
            ),
            EvalErrorType::DuplicateKey { key } => (
                format!("Key `{key}` is defined again here"),
                vec!["Keys of a map literal must be unique".into()],
            ),
            EvalErrorType::MissingKey { key } => (
                format!("No key `{key}` in this map"),
                vec![],
            ),
            EvalErrorType::Index { index, length } => (
                format!("Index {index} is out of bounds"),
                vec![format!("The list has {length} elements")],
            ),
            EvalErrorType::NoSuchMethod { name, receiver } => (
                format!("No method `{name}` on a {receiver}"),
                vec!["String methods: unindent, trim, lines, contains, starts_with, ends_with".into()],
            ),
            EvalErrorType::InterpolationType { found } => (
                format!("Cannot interpolate a {found}"),
                vec!["Only strings, numbers and booleans can appear inside `${...}`".into()],
            ),
            EvalErrorType::TypeMismatch { expected, found } => (
                format!("Expected {expected}, found {found}"),
                vec![],
            ),
            EvalErrorType::RecursionLimitExceeded { limit } => (
                "Evaluation nests too deeply".into(),
                vec![format!("The limit is {limit} nested evaluations")],
            ),
        }
    }
}

pub fn eval_error<T>(error: EvalErrorType, span: SrcSpan) -> Result<T, EvalError> {
    Err(EvalError { error, span })
}
