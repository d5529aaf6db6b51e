pub mod error;
pub mod evaluator;
pub mod functions;
pub mod methods;

pub mod prelude {
    pub use super::{
        error::*,
        evaluator::*,
        functions::*,
        methods::*
    };
}

#[cfg(test)]
mod tests;
