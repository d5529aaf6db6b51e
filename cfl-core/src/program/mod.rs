use std::{collections::HashMap, path::PathBuf};

use tracing::instrument;

use crate::{
    environment::prelude::{Environment, Value},
    eval::prelude::{EvalError, EvalErrorType, Evaluator, Limits},
    parser::prelude::{parse_module, Expression, ParseError},
    utils::prelude::{Error, SrcSpan},
};

/// Initial bindings supplied by whoever loads the source.
pub type Arguments = HashMap<String, Value>;

/// A parsed source, ready to be evaluated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub expression: Expression,
    pub comments: Vec<SrcSpan>,
}

impl Program {
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let parsed = parse_module(src)?;

        Ok(Self {
            expression: parsed.expression,
            comments: parsed.comments,
        })
    }

    pub fn evaluate(&self, args: &Arguments) -> Result<Value, EvalError> {
        self.evaluate_with(args, Limits::default())
    }

    /// Every argument is bound in the root scope. A program that evaluates to a
    /// closure is applied once more, its parameters filled from `args` by name.
    #[instrument(skip_all, fields(arguments = args.len(), max_depth = limits.max_depth))]
    pub fn evaluate_with(&self, args: &Arguments, limits: Limits) -> Result<Value, EvalError> {
        let env: Environment = args.iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        match self.evaluate_in(&env, limits)? {
            Value::Closure { closure } => {
                let arguments = closure.lambda.parameters.iter()
                    .map(|parameter| match args.get(&parameter.value) {
                        Some(value) => Ok(value.clone()),
                        None => Err(EvalError {
                            error: EvalErrorType::UnboundName { name: parameter.value.clone() },
                            span: parameter.location
                        }),
                    })
                    .collect::<Result<Vec<Value>, EvalError>>()?;

                Evaluator::new(limits).apply(&closure, arguments, self.expression.location())
            },
            value => Ok(value),
        }
    }

    /// Evaluates the expression as written in `env`. A resulting closure is returned, not applied.
    pub fn evaluate_in(&self, env: &Environment, limits: Limits) -> Result<Value, EvalError> {
        Evaluator::new(limits).eval(&self.expression, env)
    }
}

/// Parses and evaluates `src` in one go.
pub fn evaluate(src: &str, args: &Arguments) -> Result<Value, Error> {
    let program = Program::parse(src).map_err(|error| Error::Parse {
        path: PathBuf::new(),
        src: src.to_string(),
        error
    })?;

    program.evaluate(args).map_err(|error| Error::Eval {
        path: PathBuf::new(),
        src: src.to_string(),
        error
    })
}
