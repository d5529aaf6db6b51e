use thiserror::Error;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    #[error("unexpected character `{tok}`")]
    UnrecognizedToken { tok: char },
    #[error("unknown escape sequence `\\{ch}`")]
    UnknownEscape { ch: char },
    #[error("string is not closed before the end of the line")]
    UnterminatedString,
    #[error("block string is never closed")]
    UnterminatedBlockString,
    #[error("interpolation `${{` is never closed")]
    UnterminatedInterpolation,
    #[error("number does not fit in a 64-bit integer")]
    NumberTooLarge,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{error} at {location}")]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan,
}

impl LexicalError {
    pub fn details(&self) -> (String, Vec<String>) {
        let hints = match self.error {
            LexicalErrorType::UnknownEscape { .. } => {
                vec!["Supported escapes are \\n, \\t, \\r, \\\", \\\\ and \\$".to_string()]
            }
            LexicalErrorType::UnterminatedString => {
                vec!["Use a \"\"\" block string for text spanning several lines".to_string()]
            }
            _ => vec![],
        };

        (self.error.to_string(), hints)
    }
}
