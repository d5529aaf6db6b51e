use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Closure, Environment, Map, Value, ValueType},
    eval::prelude::EvalErrorType,
    parser::prelude::{parse_module, Expression},
};

fn map(entries: Vec<(&str, Value)>) -> Map {
    let entries = entries.into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

    Map::new(entries).expect("unique keys")
}

#[test]
fn test_lookup_walks_innermost_first() {
    let root = Environment::new()
        .extend("os", "linux".into())
        .extend("n", 1.into());
    let inner = root.extend("os", "macos".into());

    assert_eq!(inner.lookup("os"), Ok(&Value::from("macos")));
    assert_eq!(inner.lookup("n"), Ok(&Value::from(1)));
    assert_eq!(root.lookup("os"), Ok(&Value::from("linux")));
    assert_eq!(inner.names(), vec!["os", "n", "os"]);
}

#[test]
fn test_unbound_name() {
    let env = Environment::new().extend("a", true.into());

    assert_eq!(
        env.lookup("b"),
        Err(EvalErrorType::UnboundName { name: "b".into() })
    );
    assert_eq!(
        Environment::new().lookup("a"),
        Err(EvalErrorType::UnboundName { name: "a".into() })
    );
}

#[test]
fn test_extend_leaves_parent_untouched() {
    let parent = Environment::new().extend("a", 1.into());
    let copy = parent.clone();
    let _child = parent.extend("b", 2.into());

    assert!(parent.ptr_eq(&copy));
    assert!(parent.lookup("b").is_err());
    assert_eq!(parent.names(), vec!["a"]);
}

#[test]
fn test_from_arguments() {
    let env: Environment = vec![
        ("os".to_string(), Value::from("linux")),
        ("count".to_string(), Value::from(2)),
    ]
    .into_iter()
    .collect();

    assert_eq!(env.lookup("os"), Ok(&Value::from("linux")));
    assert_eq!(env.lookup("count"), Ok(&Value::from(2)));
}

#[test]
fn test_long_chain_drops() {
    let mut env = Environment::new();

    for i in 0..200_000 {
        env = env.extend(format!("v{i}"), Value::from(i as i64));
    }

    assert_eq!(env.lookup("v0"), Ok(&Value::from(0)));

    drop(env);
}

#[test]
fn test_map_rejects_duplicate_keys() {
    let entries = vec![
        ("a".to_string(), Value::from(1)),
        ("b".to_string(), Value::from(2)),
        ("a".to_string(), Value::from(3)),
    ];

    assert_eq!(Map::new(entries), Err("a".to_string()));
}

#[test]
fn test_map_keeps_declaration_order() {
    let map = map(vec![("z", 1.into()), ("a", 2.into()), ("runs-on", "x".into())]);

    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "runs-on"]);
    assert_eq!(map.get("a"), Some(&Value::from(2)));
    assert_eq!(map.get("missing"), None);
    assert_eq!(map.len(), 3);
}

#[test]
fn test_display_in_literal_notation() {
    let value = Value::from(map(vec![
        ("name", "build \"linux\"".into()),
        ("runs-on", "ubuntu-latest".into()),
        ("with space", 1.5.into()),
        ("let", false.into()),
        ("steps", vec![Value::from(1), Value::from(map(vec![]))].into()),
    ]));

    assert_eq!(
        value.to_string(),
        r#"{name: "build \"linux\"", runs-on: "ubuntu-latest", "with space": 1.5, "let": false, steps: [1, {}]}"#
    );
}

#[test]
fn test_interpolated_text() {
    assert_eq!(Value::from("a").as_interpolated(), Some("a".into()));
    assert_eq!(Value::from(-3).as_interpolated(), Some("-3".into()));
    assert_eq!(Value::from(2.0).as_interpolated(), Some("2.0".into()));
    assert_eq!(Value::from(true).as_interpolated(), Some("true".into()));
    assert_eq!(Value::from(vec![]).as_interpolated(), None);
    assert_eq!(Value::from(Map::default()).as_interpolated(), None);
}

#[test]
fn test_value_types() {
    assert_eq!(Value::from(1).value_type(), ValueType::Number);
    assert_eq!(Value::from(1.0).value_type(), ValueType::Number);
    assert_eq!(Value::from(vec![]).value_type().to_string(), "list");
    assert_eq!(Value::from(Map::default()).value_type().to_string(), "map");
}

#[test]
fn test_closures_compare_by_identity() {
    let lambda = match parse_module("(x) => x").map(|parsed| parsed.expression) {
        Ok(Expression::Lambda(lambda)) => lambda,
        other => panic!("expected a lambda, got {other:?}"),
    };
    let env = Environment::new().extend("a", 1.into());

    let closure = Closure { lambda: lambda.clone(), env: env.clone() };
    let same = Closure { lambda: lambda.clone(), env: env.clone() };
    let other_scope = Closure { lambda: lambda.clone(), env: env.extend("b", 2.into()) };
    let other_lambda = Closure { lambda: Arc::new((*lambda).clone()), env };

    assert_eq!(closure, same);
    assert_ne!(closure, other_scope);
    assert_ne!(closure, other_lambda);
    assert_eq!(Value::Closure { closure }.to_string(), "(x) => x");
}
