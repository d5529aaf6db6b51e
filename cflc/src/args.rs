use cfl_core::{
    lexer::prelude::{lex, Token},
    Value,
};

/// Parses `NAME=VALUE`. The value is a number or boolean when it lexes as one,
/// otherwise the text itself.
pub fn parse_argument(raw: &str) -> Result<(String, Value), String> {
    let (name, text) = raw.split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, found `{raw}`"))?;

    let mut tokens = lex(name);

    match (tokens.next_token(), tokens.next_token()) {
        (Ok((_, Token::Ident(_), _)), Ok((_, Token::Eof, _))) => {},
        _ => return Err(format!("`{name}` is not a valid name")),
    }

    Ok((name.to_string(), parse_literal(text)))
}

pub fn parse_literal(text: &str) -> Value {
    let mut tokens = lex(text);

    let literal = match tokens.next_token() {
        Ok((_, Token::Int(value), _)) => Value::Integer { value },
        Ok((_, Token::Float(value), _)) => Value::Float { value },
        Ok((_, Token::True, _)) => Value::Boolean { value: true },
        Ok((_, Token::False, _)) => Value::Boolean { value: false },
        _ => return Value::from(text),
    };

    match tokens.next_token() {
        Ok((_, Token::Eof, _)) => literal,
        _ => Value::from(text),
    }
}

#[cfg(test)]
mod tests {
    use cfl_core::Value;

    use super::{parse_argument, parse_literal};

    #[test]
    fn test_literals() {
        assert_eq!(parse_literal("42"), Value::from(42));
        assert_eq!(parse_literal("-1.5"), Value::from(-1.5));
        assert_eq!(parse_literal("true"), Value::from(true));
        assert_eq!(parse_literal("linux"), Value::from("linux"));
        assert_eq!(parse_literal("1 2"), Value::from("1 2"));
        assert_eq!(parse_literal("1.x"), Value::from("1.x"));
        assert_eq!(parse_literal(""), Value::from(""));
    }

    #[test]
    fn test_arguments() {
        assert_eq!(parse_argument("os=linux"), Ok(("os".into(), Value::from("linux"))));
        assert_eq!(parse_argument("runs-on=a=b"), Ok(("runs-on".into(), Value::from("a=b"))));
        assert!(parse_argument("os").is_err());
        assert!(parse_argument("let=1").is_err());
        assert!(parse_argument("two words=1").is_err());
    }
}
