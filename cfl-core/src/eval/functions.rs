use crate::{
    environment::prelude::{Map, Value},
    utils::prelude::SrcSpan,
};
use super::error::{eval_error, EvalError, EvalErrorType};
use super::evaluator::Evaluator;

/// Built-in function, callable by name unless a binding shadows it.
pub type Function = fn(&mut Evaluator, Vec<Value>, SrcSpan) -> Result<Value, EvalError>;

pub fn function(name: &str) -> Option<Function> {
    let function: Function = match name {
        "concat" => concat,
        "merge" => merge,
        "fold" => fold,

        _ => return None
    };

    Some(function)
}

/// `concat(list, ...)` joins lists in argument order.
fn concat(_: &mut Evaluator, arguments: Vec<Value>, span: SrcSpan) -> Result<Value, EvalError> {
    if arguments.is_empty() {
        return eval_error(EvalErrorType::Arity { expected: 1, got: 0 }, span);
    }

    let mut items = vec![];

    for argument in arguments {
        match argument {
            Value::List { items: list } => items.extend(list.iter().cloned()),
            other => return eval_error(
                EvalErrorType::TypeMismatch { expected: "a list", found: other.value_type() },
                span
            ),
        }
    }

    Ok(items.into())
}

/// `merge(map, ...)` or `merge([map, ...])`. A later map overrides keys of an earlier one;
/// keys keep the position of their first appearance.
fn merge(_: &mut Evaluator, arguments: Vec<Value>, span: SrcSpan) -> Result<Value, EvalError> {
    let listed = match arguments.as_slice() {
        [] => return eval_error(EvalErrorType::Arity { expected: 1, got: 0 }, span),
        [Value::List { items }] => Some(items.to_vec()),
        _ => None,
    };
    let maps = listed.unwrap_or(arguments);

    let mut entries: Vec<(String, Value)> = vec![];

    for map in maps {
        let map = match map {
            Value::Map { map } => map,
            other => return eval_error(
                EvalErrorType::TypeMismatch { expected: "a map", found: other.value_type() },
                span
            ),
        };

        for (key, value) in map.iter() {
            match entries.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = value.clone(),
                None => entries.push((key.to_string(), value.clone())),
            }
        }
    }

    Map::new(entries)
        .map(Value::from)
        .or_else(|key| eval_error(EvalErrorType::DuplicateKey { key }, span))
}

/// `fold(init, (acc, ix, val) => ..., list|map)`. Lists pass the position as `ix`,
/// maps pass the key, in declaration order.
fn fold(evaluator: &mut Evaluator, arguments: Vec<Value>, span: SrcSpan) -> Result<Value, EvalError> {
    let [init, function, collection]: [Value; 3] = match arguments.try_into() {
        Ok(arguments) => arguments,
        Err(arguments) => return eval_error(
            EvalErrorType::Arity { expected: 3, got: arguments.len() },
            span
        ),
    };

    let closure = match function {
        Value::Closure { closure } => closure,
        other => return eval_error(
            EvalErrorType::TypeMismatch { expected: "a function", found: other.value_type() },
            span
        ),
    };

    let steps: Vec<(Value, Value)> = match collection {
        Value::List { items } => items.iter()
            .enumerate()
            .map(|(position, item)| (Value::from(position as i64), item.clone()))
            .collect(),
        Value::Map { map } => map.iter()
            .map(|(key, value)| (Value::from(key), value.clone()))
            .collect(),
        other => return eval_error(
            EvalErrorType::TypeMismatch { expected: "a list or a map", found: other.value_type() },
            span
        ),
    };

    steps.into_iter()
        .try_fold(init, |acc, (ix, val)| evaluator.apply(&closure, vec![acc, ix, val], span))
}
