use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{eval::prelude::EvalError, parser::prelude::ParseError};
use super::diagnostic::{Diagnostic, Label, Location};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to parse source code: {error}")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("evaluation failed: {error}")]
    Eval {
        path: PathBuf,
        src: String,
        error: EvalError
    },
    #[error("IO operation failed: {err}")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::StdIo { err: err.kind() }
    }
}

impl Error {
    /// Attaches the file the source was read from.
    pub fn with_path(self, path: PathBuf) -> Self {
        match self {
            Self::Parse { src, error, .. } => Self::Parse { path, src, error },
            Self::Eval { src, error, .. } => Self::Eval { path, src, error },
            err => err,
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Parse { path, src, error } => {
                let (label, notes) = error.details();

                vec![Diagnostic {
                    title: "Syntax error".into(),
                    notes,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Eval { path, src, error } => {
                let (label, notes) = error.details();

                vec![Diagnostic {
                    title: "Evaluation error".into(),
                    notes,
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        label: Label {
                            text: Some(label),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    notes: vec![format!("{err}")],
                    location: None,
                }]
            }
        }
    }
}
