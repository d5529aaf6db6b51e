use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Map, Value, ValueType},
    eval::prelude::{unindent, EvalError, EvalErrorType, Limits},
    program::{Arguments, Program},
    utils::prelude::SrcSpan,
};

fn arguments(args: Vec<(&str, Value)>) -> Arguments {
    args.into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn program(src: &str) -> Program {
    match Program::parse(src) {
        Ok(program) => program,
        Err(err) => panic!("{src:?} failed to parse: {err}"),
    }
}

fn eval_with(src: &str, args: Vec<(&str, Value)>) -> Result<Value, EvalError> {
    program(src).evaluate(&arguments(args))
}

fn value(src: &str) -> Value {
    match eval_with(src, vec![]) {
        Ok(value) => value,
        Err(err) => panic!("{src:?} failed: {err}"),
    }
}

fn error(src: &str) -> EvalError {
    match eval_with(src, vec![]) {
        Ok(value) => panic!("{src:?} evaluated to {value}"),
        Err(err) => err,
    }
}

fn strings(items: &[&str]) -> Value {
    items.iter().map(|item| Value::from(*item)).collect::<Vec<Value>>().into()
}

#[test]
fn test_literals() {
    assert_eq!(value("42"), Value::from(42));
    assert_eq!(value("-2.5"), Value::from(-2.5));
    assert_eq!(value("true"), Value::from(true));
    assert_eq!(value(r#""text""#), Value::from("text"));
    assert_eq!(value("[1, [true]]").to_string(), "[1, [true]]");
}

#[test]
fn test_shadowing() {
    assert_eq!(value("let x = 1 in let x = 2 in x"), Value::from(2));
    assert_eq!(value("let x = 1 x = 2 in x"), Value::from(2));
    assert_eq!(value("let x = 1 in [let x = 2 in x, x]").to_string(), "[2, 1]");
}

#[test]
fn test_bindings_are_sequential() {
    assert_eq!(value("let a = 1 b = [a, a] in b").to_string(), "[1, 1]");

    let err = error("let a = b b = 1 in a");
    assert_eq!(err.error, EvalErrorType::UnboundName { name: "b".into() });
    assert_eq!(err.span, SrcSpan::from(8, 9));
}

#[test]
fn test_bindings_are_not_recursive() {
    let err = error("let f = (n) => f(n) in f(1)");

    assert_eq!(err.error, EvalErrorType::UnboundName { name: "f".into() });
    assert_eq!(err.span, SrcSpan::from(15, 16));
}

#[test]
fn test_closures_capture_their_definition_scope() {
    assert_eq!(value("let x = 1 f = () => x in let x = 2 in f()"), Value::from(1));
    assert_eq!(
        value("let pair = (a) => (b) => [a, b] in pair(1)(2)").to_string(),
        "[1, 2]"
    );
}

#[test]
fn test_arguments_are_evaluated_in_caller_scope() {
    assert_eq!(value("let x = 1 id = (x) => x in let x = 3 in id(x)"), Value::from(3));
}

#[test]
fn test_arity() {
    let err = error("let f = (a) => a in f(1, 2)");

    assert_eq!(err.error, EvalErrorType::Arity { expected: 1, got: 2 });
    assert_eq!(err.span, SrcSpan::from(20, 27));

    assert_eq!(
        error("(() => 1)(true)").error,
        EvalErrorType::Arity { expected: 0, got: 1 }
    );
}

#[test]
fn test_not_callable() {
    let err = error("let a = 1 in a(2)");

    assert_eq!(err.error, EvalErrorType::NotCallable { found: ValueType::Number });
    assert_eq!(err.span, SrcSpan::from(13, 14));
}

#[test]
fn test_maps() {
    match value("{z: 1, a: [], runs-on: \"x\"}") {
        Value::Map { map } => {
            assert_eq!(map.keys().collect::<Vec<&str>>(), vec!["z", "a", "runs-on"]);
            assert_eq!(map.get("runs-on"), Some(&Value::from("x")));
        }
        other => panic!("expected a map, got {other}"),
    }
}

#[test]
fn test_duplicate_key() {
    let err = error("{a: 1, a: 2}");

    assert_eq!(err.error, EvalErrorType::DuplicateKey { key: "a".into() });
    assert_eq!(err.span, SrcSpan::from(7, 8));

    assert_eq!(
        error(r#"{"a": 1 a: 2}"#).error,
        EvalErrorType::DuplicateKey { key: "a".into() }
    );
}

#[test]
fn test_index() {
    assert_eq!(value(r#"{a: 1}["a"]"#), Value::from(1));
    assert_eq!(value("[1, 2][1]"), Value::from(2));

    let cases = vec![
        (r#"{a: 1}["b"]"#, EvalErrorType::MissingKey { key: "b".into() }, SrcSpan::from(7, 10)),
        ("[1, 2][2]", EvalErrorType::Index { index: 2, length: 2 }, SrcSpan::from(7, 8)),
        ("[1][-1]", EvalErrorType::Index { index: -1, length: 1 }, SrcSpan::from(4, 6)),
        (
            r#"[1]["a"]"#,
            EvalErrorType::TypeMismatch { expected: "an integer index", found: ValueType::String },
            SrcSpan::from(4, 7),
        ),
        (
            "{a: 1}[0]",
            EvalErrorType::TypeMismatch { expected: "a string key", found: ValueType::Number },
            SrcSpan::from(7, 8),
        ),
        (
            r#""s"[0]"#,
            EvalErrorType::TypeMismatch { expected: "a map or a list", found: ValueType::String },
            SrcSpan::from(0, 3),
        ),
    ];

    for (src, error_type, span) in cases {
        let err = error(src);

        assert_eq!(err.error, error_type, "error for {src:?}");
        assert_eq!(err.span, span, "span for {src:?}");
    }
}

#[test]
fn test_member_access() {
    assert_eq!(value("{a: {b: 1}}.a.b"), Value::from(1));
    assert_eq!(value("let m = {twice: (x) => [x, x]} in m.twice(1)").to_string(), "[1, 1]");

    let cases = vec![
        ("{a: 1}.b", EvalErrorType::MissingKey { key: "b".into() }, SrcSpan::from(7, 8)),
        ("{a: 1}.a()", EvalErrorType::NotCallable { found: ValueType::Number }, SrcSpan::from(7, 8)),
        (
            "{a: 1}.trim()",
            EvalErrorType::NoSuchMethod { name: "trim".into(), receiver: ValueType::Map },
            SrcSpan::from(7, 11),
        ),
        (
            "{a: 1}.unindent()",
            EvalErrorType::NoSuchMethod { name: "unindent".into(), receiver: ValueType::Map },
            SrcSpan::from(7, 15),
        ),
        (
            "[1].len",
            EvalErrorType::NoSuchMethod { name: "len".into(), receiver: ValueType::List },
            SrcSpan::from(4, 7),
        ),
        (
            r#""x".len()"#,
            EvalErrorType::NoSuchMethod { name: "len".into(), receiver: ValueType::String },
            SrcSpan::from(4, 7),
        ),
        (
            r#""x".trim"#,
            EvalErrorType::NoSuchMethod { name: "trim".into(), receiver: ValueType::String },
            SrcSpan::from(4, 8),
        ),
        (
            "1.trim()",
            EvalErrorType::NoSuchMethod { name: "trim".into(), receiver: ValueType::Number },
            SrcSpan::from(2, 6),
        ),
    ];

    for (src, error_type, span) in cases {
        let err = error(src);

        assert_eq!(err.error, error_type, "error for {src:?}");
        assert_eq!(err.span, span, "span for {src:?}");
    }
}

#[test]
fn test_unindent_and_trim() {
    assert_eq!(value(r#""  a\n  b\n".unindent()"#), Value::from("a\nb\n"));
    assert_eq!(value(r#""  a  ".trim()"#), Value::from("a"));
    assert_eq!(value(r#""\n    x\n  ".unindent().trim()"#), Value::from("x"));
}

#[test]
fn test_unindent() {
    let cases = vec![
        ("", ""),
        ("no indent", "no indent"),
        ("    a\n      b\n    c", "a\n  b\nc"),
        ("  a\n\n  b", "a\n\nb"),
        ("    a\n  \n    b\n", "a\n\nb\n"),
        ("\ta\n\t\tb", "a\n\tb"),
        ("  a\n b", " a\nb"),
        ("   \n   ", "\n"),
    ];

    for (input, expected) in cases {
        assert_eq!(unindent(input), expected, "unindent of {input:?}");
    }
}

#[test]
fn test_other_string_methods() {
    assert_eq!(value(r#""a\nb\n".lines()"#), strings(&["a", "b"]));
    assert_eq!(value(r#""a\n\nb".lines()"#), strings(&["a", "", "b"]));
    assert_eq!(value(r#""".lines()"#), strings(&[]));
    assert_eq!(value(r#""ubuntu-latest".starts_with("ubuntu")"#), Value::from(true));
    assert_eq!(value(r#""ubuntu-latest".ends_with("ubuntu")"#), Value::from(false));
    assert_eq!(value(r#""ubuntu-latest".contains("-")"#), Value::from(true));
}

#[test]
fn test_method_argument_errors() {
    let cases = vec![
        (r#""a".trim(1)"#, EvalErrorType::Arity { expected: 0, got: 1 }),
        (r#""a".contains()"#, EvalErrorType::Arity { expected: 1, got: 0 }),
        (r#""a".contains("a", "b")"#, EvalErrorType::Arity { expected: 1, got: 2 }),
        (r#""a".contains(1)"#, EvalErrorType::TypeMismatch { expected: "string", found: ValueType::Number }),
    ];

    for (src, error_type) in cases {
        assert_eq!(error(src).error, error_type, "error for {src:?}");
    }

    assert_eq!(error(r#""a".trim(1)"#).span, SrcSpan::from(0, 11));
}

#[test]
fn test_interpolation() {
    let runner_map = Map::new(vec![("linux".into(), Value::from("ubuntu-latest"))])
        .expect("unique keys");

    let result = eval_with(
        r#""${runner_map[os]}""#,
        vec![("runner_map", runner_map.into()), ("os", "linux".into())],
    );

    assert_eq!(result, Ok(Value::from("ubuntu-latest")));
    assert_eq!(value(r#""${1}-${true}-${2.5}-${"s"}""#), Value::from("1-true-2.5-s"));
    assert_eq!(
        value(r#"let os = "linux" in """zip ${os}.zip""""#),
        Value::from("zip linux.zip")
    );
}

#[test]
fn test_interpolation_rejects_compound_values() {
    let err = error(r#""${[1]}""#);

    assert_eq!(err.error, EvalErrorType::InterpolationType { found: ValueType::List });
    assert_eq!(err.span, SrcSpan::from(3, 6));

    assert_eq!(
        error(r#""${() => 1}""#).error,
        EvalErrorType::InterpolationType { found: ValueType::Closure }
    );
}

#[test]
fn test_determinism() {
    let program = program(
        r#"let m = {a: [1, 2.5, "x"]} in (os) => {os: os, items: m.a, name: "build-${os}"}"#
    );
    let args = arguments(vec![("os", "linux".into())]);

    let first = program.evaluate(&args);

    assert!(first.is_ok());
    assert_eq!(first, program.evaluate(&args));
}

#[test]
fn test_recursion_limit() {
    let err = error("let f = (g) => g(g) in f(f)");

    assert_eq!(err.error, EvalErrorType::RecursionLimitExceeded { limit: 256 });
}

#[test]
fn test_custom_limits() {
    let shallow = Limits { max_depth: 3 };

    assert!(program("[[1]]").evaluate_with(&Arguments::new(), shallow).is_ok());
    assert_eq!(
        program("[[[1]]]").evaluate_with(&Arguments::new(), shallow).map_err(|err| err.error),
        Err(EvalErrorType::RecursionLimitExceeded { limit: 3 })
    );
}

#[test]
fn test_top_level_closure_is_applied_by_name() {
    let result = eval_with(
        r#"(arch, os) => "${os}-${arch}""#,
        vec![("os", "linux".into()), ("arch", "x64".into())],
    );

    assert_eq!(result, Ok(Value::from("linux-x64")));

    let err = match eval_with("(os, arch) => os", vec![("os", "linux".into())]) {
        Ok(value) => panic!("evaluated to {value}"),
        Err(err) => err,
    };

    assert_eq!(err.error, EvalErrorType::UnboundName { name: "arch".into() });
    assert_eq!(err.span, SrcSpan::from(5, 9));
}

#[test]
fn test_arguments_are_bound_in_root_scope() {
    assert_eq!(eval_with("os", vec![("os", "macos".into())]), Ok(Value::from("macos")));

    let err = error("name");
    assert_eq!(err.error, EvalErrorType::UnboundName { name: "name".into() });
    assert_eq!(err.span, SrcSpan::from(0, 4));
}

#[test]
fn test_nested_closures_are_values() {
    assert_eq!(value("[(x) => x]").to_string(), "[(x) => x]");
}

#[test]
fn test_concat() {
    assert_eq!(value("concat([1], [2, 3], [4])").to_string(), "[1, 2, 3, 4]");
    assert_eq!(value("concat([])").to_string(), "[]");
    assert_eq!(
        value(r#"let shared = [{run: "checkout"}] in concat(shared, [{run: "build"}])"#).to_string(),
        r#"[{run: "checkout"}, {run: "build"}]"#
    );
}

#[test]
fn test_merge() {
    assert_eq!(
        value(r#"merge({name: "john"}, {name: "alexei"}, {age: 40},)"#).to_string(),
        r#"{name: "alexei", age: 40}"#
    );
    assert_eq!(
        value(r#"merge([{name: "john"}, {age: 40}])"#).to_string(),
        r#"{name: "john", age: 40}"#
    );
    assert_eq!(value("merge([])").to_string(), "{}");
}

#[test]
fn test_fold() {
    assert_eq!(
        value("fold([], (acc, ix, val) => concat(acc, [ix, val]), [10, 20])").to_string(),
        "[0, 10, 1, 20]"
    );
    assert_eq!(
        value(r#"fold([], (acc, ix, val) => concat(acc, ["${ix}=${val}"]), {aa: 1, bb: 2, cc: 3})"#).to_string(),
        r#"["aa=1", "bb=2", "cc=3"]"#
    );
    assert_eq!(value("fold(0, (acc, ix, val) => val, [])"), Value::from(0));
}

#[test]
fn test_bindings_shadow_functions() {
    assert_eq!(value("let concat = (a, b) => a in concat(1, 2)"), Value::from(1));
    assert_eq!(value("((merge) => merge)(5)"), Value::from(5));
}

#[test]
fn test_function_argument_errors() {
    let cases = vec![
        ("concat()", EvalErrorType::Arity { expected: 1, got: 0 }, SrcSpan::from(0, 8)),
        (
            "concat([1], 2)",
            EvalErrorType::TypeMismatch { expected: "a list", found: ValueType::Number },
            SrcSpan::from(0, 14),
        ),
        ("merge()", EvalErrorType::Arity { expected: 1, got: 0 }, SrcSpan::from(0, 7)),
        (
            r#"merge({a: 1}, "b")"#,
            EvalErrorType::TypeMismatch { expected: "a map", found: ValueType::String },
            SrcSpan::from(0, 18),
        ),
        ("fold(0, [])", EvalErrorType::Arity { expected: 3, got: 2 }, SrcSpan::from(0, 11)),
        (
            "fold(0, 1, [])",
            EvalErrorType::TypeMismatch { expected: "a function", found: ValueType::Number },
            SrcSpan::from(0, 14),
        ),
        (
            "fold(0, (a, i, v) => v, true)",
            EvalErrorType::TypeMismatch { expected: "a list or a map", found: ValueType::Boolean },
            SrcSpan::from(0, 29),
        ),
        (
            "fold(0, (a) => a, [1])",
            EvalErrorType::Arity { expected: 1, got: 3 },
            SrcSpan::from(0, 22),
        ),
        ("nope(1)", EvalErrorType::UnboundName { name: "nope".into() }, SrcSpan::from(0, 4)),
    ];

    for (src, error_type, span) in cases {
        let err = error(src);

        assert_eq!(err.error, error_type, "error for {src:?}");
        assert_eq!(err.span, span, "span for {src:?}");
    }
}
