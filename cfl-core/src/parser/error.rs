use thiserror::Error;

use crate::{lexer::prelude::{LexicalError, Token}, utils::prelude::SrcSpan};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("expected an identifier")]
    ExpectedIdent,
    #[error("expected at least one binding after `let`")]
    ExpectedBinding,
    #[error("map keys must be identifiers or plain strings")]
    InvalidMapKey,
    #[error("parameter `{name}` is declared twice")]
    DuplicateParameter { name: String },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("found {}, expected {}", .token.describe(), .expected.join(" or "))]
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    #[error("{error}")]
    LexError { error: LexicalError },
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{error} at {span}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (String, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedIdent => ("Expected identifier".into(), vec![]),
            ParseErrorType::ExpectedBinding => (
                "Expected a binding".into(),
                vec!["A `let` block needs at least one `name = expression` before `in`".into()],
            ),
            ParseErrorType::InvalidMapKey => (
                "Invalid map key".into(),
                vec!["Interpolated strings cannot be used as map keys".into()],
            ),
            ParseErrorType::DuplicateParameter { name } => (
                format!("Duplicate parameter `{name}`"),
                vec![],
            ),
            ParseErrorType::UnexpectedToken { token, expected } => {
                let messages = std::iter::once(format!("Found {}, expected one of: ", token.describe()))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this".into(), messages)
            },
            ParseErrorType::UnexpectedEof => ("Unexpected end of input".into(), vec![]),
            ParseErrorType::LexError { error } => error.details()
        }
    }
}
