pub mod lexer;
pub mod parser;
pub mod environment;
pub mod eval;
pub mod program;
pub mod utils;

pub use environment::prelude::{Closure, Environment, Map, Value, ValueType};
pub use eval::prelude::{EvalError, EvalErrorType, Limits};
pub use program::{evaluate, Arguments, Program};
pub use utils::prelude::Error;
