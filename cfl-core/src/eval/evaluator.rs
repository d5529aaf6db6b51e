use std::sync::Arc;

use tracing::debug;

use crate::{
    environment::prelude::{Closure, Environment, Map, Value, ValueType},
    parser::prelude::{Apply, Expression, Index, Let, MapLiteral, Member, Primitive, Segment, Template},
    utils::prelude::SrcSpan,
};
use super::error::{eval_error, EvalError, EvalErrorType};
use super::functions::function;
use super::methods::string_method;

const RED_ZONE: usize = 64 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// How many evaluations may be nested inside one another.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// Tree-walking evaluator. One instance serves one evaluation; the only state is the nesting depth.
#[derive(Debug)]
pub struct Evaluator {
    depth: usize,
    limits: Limits,
}

impl Evaluator {
    pub fn new(limits: Limits) -> Self {
        Self { depth: 0, limits }
    }

    pub fn eval(&mut self, expression: &Expression, env: &Environment) -> Result<Value, EvalError> {
        if self.depth >= self.limits.max_depth {
            return eval_error(
                EvalErrorType::RecursionLimitExceeded { limit: self.limits.max_depth },
                expression.location()
            );
        }

        self.depth += 1;
        let value = stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.eval_expression(expression, env)
        });
        self.depth -= 1;

        value
    }

    fn eval_expression(&mut self, expression: &Expression, env: &Environment) -> Result<Value, EvalError> {
        match expression {
            Expression::Primitive(primitive) => Ok(match primitive {
                Primitive::Int { value, .. } => Value::Integer { value: *value },
                Primitive::Float { value, .. } => Value::Float { value: *value },
                Primitive::Bool { value, .. } => Value::Boolean { value: *value },
            }),
            Expression::Template(template) => self.eval_template(template, env),
            Expression::Identifier(identifier) => env.lookup(&identifier.value)
                .cloned()
                .map_err(|error| EvalError { error, span: identifier.location }),
            Expression::Let(let_) => self.eval_let(let_, env),
            Expression::Lambda(lambda) => Ok(Value::Closure {
                closure: Closure {
                    lambda: Arc::clone(lambda),
                    env: env.clone()
                }
            }),
            Expression::Apply(apply) => self.eval_apply(apply, env),
            Expression::Map(map) => self.eval_map(map, env),
            Expression::List(list) => {
                let items = self.eval_all(&list.items, env)?;

                Ok(items.into())
            },
            Expression::Member(member) => self.eval_member(member, env),
            Expression::Index(index) => self.eval_index(index, env),
        }
    }

    fn eval_all(&mut self, expressions: &[Expression], env: &Environment) -> Result<Vec<Value>, EvalError> {
        expressions.iter()
            .map(|expression| self.eval(expression, env))
            .collect()
    }

    // each binding sees only the ones before it
    fn eval_let(&mut self, let_: &Let, env: &Environment) -> Result<Value, EvalError> {
        let names: Vec<&str> = let_.bindings.iter()
            .map(|binding| binding.name.value.as_str())
            .collect();

        debug!(bindings = ?names, "entering let block");

        let mut scope = env.clone();

        for binding in &let_.bindings {
            let value = self.eval(&binding.value, &scope)?;
            scope = scope.extend(binding.name.value.clone(), value);
        }

        self.eval(&let_.body, &scope)
    }

    fn eval_apply(&mut self, apply: &Apply, env: &Environment) -> Result<Value, EvalError> {
        // built-ins resolve only where the name is not bound
        if let Expression::Identifier(identifier) = &*apply.callee {
            if let (Err(_), Some(function)) = (env.lookup(&identifier.value), function(&identifier.value)) {
                let arguments = self.eval_all(&apply.arguments, env)?;

                return function(self, arguments, apply.location);
            }
        }

        let closure = match self.eval(&apply.callee, env)? {
            Value::Closure { closure } => closure,
            other => return eval_error(
                EvalErrorType::NotCallable { found: other.value_type() },
                apply.callee.location()
            ),
        };

        let arguments = self.eval_all(&apply.arguments, env)?;

        self.apply(&closure, arguments, apply.location)
    }

    /// Runs the closure body in its captured scope with the parameters bound positionally.
    pub fn apply(&mut self, closure: &Closure, arguments: Vec<Value>, span: SrcSpan) -> Result<Value, EvalError> {
        let lambda = &closure.lambda;

        if lambda.parameters.len() != arguments.len() {
            return eval_error(
                EvalErrorType::Arity { expected: lambda.parameters.len(), got: arguments.len() },
                span
            );
        }

        debug!(arity = arguments.len(), depth = self.depth, "applying closure");

        let scope = lambda.parameters.iter()
            .zip(arguments)
            .fold(closure.env.clone(), |scope, (parameter, value)| {
                scope.extend(parameter.value.clone(), value)
            });

        self.eval(&lambda.body, &scope)
    }

    fn eval_map(&mut self, map: &MapLiteral, env: &Environment) -> Result<Value, EvalError> {
        let mut entries = Vec::with_capacity(map.entries.len());

        for (key, expression) in &map.entries {
            let value = self.eval(expression, env)?;
            entries.push((key.value.clone(), value));
        }

        match Map::new(entries) {
            Ok(map) => Ok(map.into()),
            Err(key) => {
                // report the second occurrence
                let span = map.entries.iter()
                    .filter(|(entry, _)| entry.value == key)
                    .nth(1)
                    .map(|(entry, _)| entry.location)
                    .unwrap_or(map.location);

                eval_error(EvalErrorType::DuplicateKey { key }, span)
            }
        }
    }

    fn eval_member(&mut self, member: &Member, env: &Environment) -> Result<Value, EvalError> {
        let receiver = self.eval(&member.receiver, env)?;
        let name = &member.name.value;

        let arguments = match &member.arguments {
            Some(arguments) => Some(self.eval_all(arguments, env)?),
            None => None,
        };

        match (receiver, arguments) {
            (Value::Map { map }, arguments) => match (map.get(name).cloned(), arguments) {
                (Some(value), None) => Ok(value),
                (None, None) => eval_error(
                    EvalErrorType::MissingKey { key: name.clone() },
                    member.name.location
                ),
                (Some(Value::Closure { closure }), Some(arguments)) => {
                    self.apply(&closure, arguments, member.location)
                },
                (Some(other), Some(_)) => eval_error(
                    EvalErrorType::NotCallable { found: other.value_type() },
                    member.name.location
                ),
                // maps have no built-in methods
                (None, Some(_)) => eval_error(
                    EvalErrorType::NoSuchMethod { name: name.clone(), receiver: ValueType::Map },
                    member.name.location
                ),
            },
            (Value::String { value }, Some(arguments)) => match string_method(name) {
                Some(method) => method(&value, &arguments)
                    .map_err(|error| EvalError { error, span: member.location }),
                None => eval_error(
                    EvalErrorType::NoSuchMethod { name: name.clone(), receiver: ValueType::String },
                    member.name.location
                ),
            },
            (other, _) => eval_error(
                EvalErrorType::NoSuchMethod { name: name.clone(), receiver: other.value_type() },
                member.name.location
            ),
        }
    }

    fn eval_index(&mut self, index: &Index, env: &Environment) -> Result<Value, EvalError> {
        let receiver = self.eval(&index.receiver, env)?;
        let key = self.eval(&index.key, env)?;
        let key_span = index.key.location();

        match (receiver, key) {
            (Value::Map { map }, Value::String { value }) => match map.get(&value) {
                Some(found) => Ok(found.clone()),
                None => eval_error(EvalErrorType::MissingKey { key: value }, key_span),
            },
            (Value::Map { .. }, other) => eval_error(
                EvalErrorType::TypeMismatch { expected: "a string key", found: other.value_type() },
                key_span
            ),
            (Value::List { items }, Value::Integer { value }) => {
                let found = usize::try_from(value).ok()
                    .and_then(|position| items.get(position));

                match found {
                    Some(found) => Ok(found.clone()),
                    None => eval_error(
                        EvalErrorType::Index { index: value, length: items.len() },
                        key_span
                    ),
                }
            },
            (Value::List { .. }, other) => eval_error(
                EvalErrorType::TypeMismatch { expected: "an integer index", found: other.value_type() },
                key_span
            ),
            (other, _) => eval_error(
                EvalErrorType::TypeMismatch { expected: "a map or a list", found: other.value_type() },
                index.receiver.location()
            ),
        }
    }

    fn eval_template(&mut self, template: &Template, env: &Environment) -> Result<Value, EvalError> {
        let mut text = String::new();

        for segment in &template.segments {
            match segment {
                Segment::Text(literal) => text.push_str(literal),
                Segment::Expression(expression) => {
                    let value = self.eval(expression, env)?;

                    match value.as_interpolated() {
                        Some(interpolated) => text.push_str(&interpolated),
                        None => return eval_error(
                            EvalErrorType::InterpolationType { found: value.value_type() },
                            expression.location()
                        ),
                    }
                }
            }
        }

        Ok(text.into())
    }
}
