use crate::environment::prelude::Value;
use super::error::EvalErrorType;

/// Built-in method on a string receiver.
pub type StringMethod = fn(&str, &[Value]) -> Result<Value, EvalErrorType>;

pub fn string_method(name: &str) -> Option<StringMethod> {
    let method: StringMethod = match name {
        "unindent" => unindent_method,
        "trim" => trim_method,
        "lines" => lines_method,
        "contains" => contains_method,
        "starts_with" => starts_with_method,
        "ends_with" => ends_with_method,

        _ => return None
    };

    Some(method)
}

fn unindent_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    no_arguments(arguments)?;

    Ok(unindent(receiver).into())
}

fn trim_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    no_arguments(arguments)?;

    Ok(receiver.trim().into())
}

// no trailing empty line for a final `\n`
fn lines_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    no_arguments(arguments)?;

    let lines = receiver.split_terminator('\n')
        .map(Value::from)
        .collect::<Vec<Value>>();

    Ok(lines.into())
}

fn contains_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    Ok(receiver.contains(string_argument(arguments)?).into())
}

fn starts_with_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    Ok(receiver.starts_with(string_argument(arguments)?).into())
}

fn ends_with_method(receiver: &str, arguments: &[Value]) -> Result<Value, EvalErrorType> {
    Ok(receiver.ends_with(string_argument(arguments)?).into())
}

fn no_arguments(arguments: &[Value]) -> Result<(), EvalErrorType> {
    match arguments {
        [] => Ok(()),
        _ => Err(EvalErrorType::Arity { expected: 0, got: arguments.len() }),
    }
}

fn string_argument(arguments: &[Value]) -> Result<&str, EvalErrorType> {
    match arguments {
        [Value::String { value }] => Ok(value),
        [other] => Err(EvalErrorType::TypeMismatch {
            expected: "string",
            found: other.value_type()
        }),
        _ => Err(EvalErrorType::Arity { expected: 1, got: arguments.len() }),
    }
}

/// Removes the longest run of leading whitespace shared by every non-blank line.
/// Blank lines lose their whitespace entirely.
pub fn unindent(text: &str) -> String {
    let prefix = text.split('\n')
        .filter(|line| !is_blank(line))
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");

    text.split('\n')
        .map(|line| match is_blank(line) {
            true => "",
            false => line.strip_prefix(prefix).unwrap_or(line),
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn common_prefix<'a>(a: &'a str, b: &'a str) -> &'a str {
    let len = a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| x.len_utf8())
        .sum();

    &a[..len]
}
