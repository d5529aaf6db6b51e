use std::collections::HashSet;
use std::fmt::Display;
use std::sync::Arc;

use crate::{lexer::prelude::{str_to_keyword, LexResult, StringPart, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::parser::{parse_error, replay, unexpected, Parse, Parser};

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub expression: Expression,
    pub comments: Vec<SrcSpan>,
}

// expr -> <let> | <lambda> | <postfix>
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Primitive(Primitive),
    Template(Template),
    Identifier(Identifier),
    Let(Let),
    Lambda(Arc<Lambda>),
    Apply(Apply),
    Map(MapLiteral),
    List(ListLiteral),
    Member(Member),
    Index(Index),
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            if parser.check(&Token::Let) {
                return Ok(Self::Let(Let::parse(parser)?));
            }

            let primary = Self::parse_primary(parser)?;

            Self::parse_postfix(parser, primary)
        })
    }
}

const RED_ZONE: usize = 64 * 1024;
const STACK_PER_RECURSION: usize = 1024 * 1024;

impl Expression {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Primitive(primitive) => primitive.location(),
            Self::Template(template) => template.location,
            Self::Identifier(identifier) => identifier.location,
            Self::Let(let_) => let_.location,
            Self::Lambda(lambda) => lambda.location,
            Self::Apply(apply) => apply.location,
            Self::Map(map) => map.location,
            Self::List(list) => list.location,
            Self::Member(member) => member.location,
            Self::Index(index) => index.location,
        }
    }

    // primary -> <map> | <list> | <string> | <number> | <bool> | <identifier> | ( <expr> ) | <lambda>
    fn parse_primary<T: Iterator<Item = LexResult>>(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, token, end) = match parser.current_token.take() {
            Some(spanned) => spanned,
            None => return parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        };
        let location = SrcSpan { start, end };

        let expression = match token {
            Token::Int(value) => Self::Primitive(Primitive::Int { value, location }),
            Token::Float(value) => Self::Primitive(Primitive::Float { value, location }),
            Token::True => Self::Primitive(Primitive::Bool { value: true, location }),
            Token::False => Self::Primitive(Primitive::Bool { value: false, location }),
            Token::Ident(value) => Self::Identifier(Identifier { value, location }),
            Token::String(parts) => Self::Template(Template::from_parts(parts, location)?),
            Token::LBrace => {
                parser.current_token = Some((start, Token::LBrace, end));

                return Ok(Self::Map(MapLiteral::parse(parser)?));
            },
            Token::LBracket => {
                parser.current_token = Some((start, Token::LBracket, end));

                return Ok(Self::List(ListLiteral::parse(parser)?));
            },
            Token::LParen => {
                parser.step();

                return Self::parse_group_or_lambda(parser, start);
            },
            token => {
                parser.current_token = Some((start, token.clone(), end));

                return unexpected((start, token, end), vec!["an expression".into()]);
            }
        };

        parser.step();

        Ok(expression)
    }

    // Two tokens of look-ahead decide between `(a, b) => ...`, `(a) => ...`, `() => ...`
    // and a parenthesised expression. The `(` is already consumed.
    fn parse_group_or_lambda<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32
    ) -> Result<Self, ParseError> {
        let is_ident = matches!(parser.current_token, Some((_, Token::Ident(_), _)));

        if parser.check(&Token::RParen) {
            parser.step();

            return Lambda::parse_rest(parser, start, vec![]);
        }

        if is_ident && parser.peek_is(&Token::Comma) {
            let parameters = Lambda::parse_parameters(parser)?;

            return Lambda::parse_rest(parser, start, parameters);
        }

        if is_ident && parser.peek_is(&Token::RParen) {
            let identifier: Identifier = parser.expect_ident()?.into();
            parser.expect_one(Token::RParen)?;

            if parser.check(&Token::Arrow) {
                return Lambda::parse_rest(parser, start, vec![identifier]);
            }

            return Ok(Self::Identifier(identifier));
        }

        let inner = Expression::parse(parser)?;
        parser.expect_one(Token::RParen)?;

        Ok(inner)
    }

    // postfix -> <primary> { . <ident> [ ( <args> ) ] | [ <expr> ] | ( <args> ) }
    fn parse_postfix<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        mut expression: Self
    ) -> Result<Self, ParseError> {
        loop {
            let start = expression.location().start;

            expression = if parser.check(&Token::Dot) {
                parser.step();

                let name: Identifier = parser.expect_ident()?.into();

                let (arguments, end) = if parser.check(&Token::LParen) {
                    parser.step();
                    let (arguments, end) = parser.parse_sequence(Token::RParen)?;

                    (Some(arguments), end)
                } else {
                    (None, name.location.end)
                };

                Self::Member(Member {
                    receiver: Box::new(expression),
                    name,
                    arguments,
                    location: SrcSpan { start, end }
                })
            } else if parser.check(&Token::LBracket) {
                parser.step();

                let key = Expression::parse(parser)?;
                let (_, end) = parser.expect_one(Token::RBracket)?;

                Self::Index(Index {
                    receiver: Box::new(expression),
                    key: Box::new(key),
                    location: SrcSpan { start, end }
                })
            } else if parser.check(&Token::LParen) {
                parser.step();

                let (arguments, end) = parser.parse_sequence(Token::RParen)?;

                Self::Apply(Apply {
                    callee: Box::new(expression),
                    arguments,
                    location: SrcSpan { start, end }
                })
            } else {
                return Ok(expression);
            };
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Template(template) => write!(f, "{template}"),
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Let(let_) => write!(f, "{let_}"),
            Self::Lambda(lambda) => write!(f, "{lambda}"),
            Self::Apply(apply) => write!(f, "{apply}"),
            Self::Map(map) => write!(f, "{map}"),
            Self::List(list) => write!(f, "{list}"),
            Self::Member(member) => write!(f, "{member}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

fn join<D: Display>(items: &[D]) -> String {
    items.iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Int {
        value: i64,
        location: SrcSpan
    },
    Float {
        value: f64,
        location: SrcSpan
    },
    Bool {
        value: bool,
        location: SrcSpan
    },
}

impl Primitive {
    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Int { location, .. }
            | Self::Float { location, .. }
            | Self::Bool { location, .. } => *location
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int { value, .. } => write!(f, "{value}"),
            Self::Float { value, .. } => write!(f, "{value:?}"),
            Self::Bool { value, .. } => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    pub location: SrcSpan
}

impl From<(u32, String, u32)> for Identifier {
    fn from((start, value, end): (u32, String, u32)) -> Self {
        Self {
            value,
            location: SrcSpan { start, end }
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Expression(Box<Expression>),
}

// string -> " { <text> | ${ <expr> } } "
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub segments: Vec<Segment>,
    pub location: SrcSpan
}

impl Template {
    fn from_parts(parts: Vec<StringPart>, location: SrcSpan) -> Result<Self, ParseError> {
        let segments = parts.into_iter()
            .map(|part| match part {
                StringPart::Text(text) => Ok(Segment::Text(text)),
                StringPart::Code(tokens) => {
                    let mut parser = Parser::new(replay(tokens));
                    let expression = Expression::parse(&mut parser)?;
                    parser.expect_one(Token::Eof)?;

                    Ok(Segment::Expression(Box::new(expression)))
                }
            })
            .collect::<Result<Vec<Segment>, ParseError>>()?;

        Ok(Self { segments, location })
    }

    /// The literal text, if the string has no interpolation.
    pub fn as_plain_text(&self) -> Option<String> {
        self.segments.iter()
            .map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::Expression(_) => None,
            })
            .collect::<Option<Vec<&str>>>()
            .map(|texts| texts.concat())
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"")?;

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => write!(f, "{}", escape(text))?,
                Segment::Expression(expression) => write!(f, "${{{expression}}}")?,
            }
        }

        write!(f, "\"")
    }
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '$' => escaped.push_str("\\$"),
            ch => escaped.push(ch),
        }
    }

    escaped
}

// binding -> <identifier> = <expr>
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Identifier,
    pub value: Expression,
}

impl Display for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}

// let -> let <binding> { <binding> } in <expr>
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub bindings: Vec<Binding>,
    pub body: Box<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Let {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, let_end) = parser.expect_one(Token::Let)?;

        let mut bindings = vec![];

        while matches!(parser.current_token, Some((_, Token::Ident(_), _))) {
            let name: Identifier = parser.expect_ident()?.into();
            parser.expect_one(Token::Assign)?;
            let value = Expression::parse(parser)?;

            bindings.push(Binding { name, value });
        }

        if bindings.is_empty() {
            let location = match &parser.current_token {
                Some((start, _, end)) => SrcSpan { start: *start, end: *end },
                None => SrcSpan { start: let_end, end: let_end },
            };

            return parse_error(ParseErrorType::ExpectedBinding, location);
        }

        parser.expect_one(Token::In)?;

        let body = Expression::parse(parser)?;
        let end = body.location().end;

        Ok(Self {
            bindings,
            body: Box::new(body),
            location: SrcSpan { start, end }
        })
    }
}

impl Display for Let {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bindings = self.bindings.iter()
            .map(|binding| binding.to_string())
            .collect::<Vec<String>>();

        write!(f, "let {} in {}", bindings.join(" "), self.body)
    }
}

// lambda -> ( [ <identifier> { , <identifier> } ] ) => <expr>
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub parameters: Vec<Identifier>,
    pub body: Expression,
    pub location: SrcSpan
}

impl Lambda {
    fn parse_parameters<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>
    ) -> Result<Vec<Identifier>, ParseError> {
        let mut parameters = vec![];

        loop {
            parameters.push(parser.expect_ident()?.into());

            if parser.check(&Token::Comma) {
                parser.step();
                continue;
            }

            parser.expect_one(Token::RParen)?;

            return Ok(parameters);
        }
    }

    fn parse_rest<T: Iterator<Item = LexResult>>(
        parser: &mut Parser<T>,
        start: u32,
        parameters: Vec<Identifier>
    ) -> Result<Expression, ParseError> {
        let mut seen = HashSet::new();

        for parameter in &parameters {
            if !seen.insert(parameter.value.as_str()) {
                return parse_error(
                    ParseErrorType::DuplicateParameter { name: parameter.value.clone() },
                    parameter.location
                );
            }
        }

        parser.expect_one(Token::Arrow)?;

        let body = Expression::parse(parser)?;
        let end = body.location().end;

        Ok(Expression::Lambda(Arc::new(Self {
            parameters,
            body,
            location: SrcSpan { start, end }
        })))
    }
}

impl Display for Lambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) => {}", join(&self.parameters), self.body)
    }
}

// apply -> <postfix> ( <args> )
#[derive(Debug, Clone, PartialEq)]
pub struct Apply {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SrcSpan
}

impl Display for Apply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.callee, join(&self.arguments))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    pub value: String,
    pub location: SrcSpan
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if is_bare_key(&self.value) {
            write!(f, "{}", self.value)
        } else {
            write!(f, "\"{}\"", escape(&self.value))
        }
    }
}

/// Whether `key` can be written without quotes.
pub fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();

    chars.next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        && str_to_keyword(key).is_none()
}

// map -> { { <key> : <expr> [,] } }
#[derive(Debug, Clone, PartialEq)]
pub struct MapLiteral {
    pub entries: Vec<(Key, Expression)>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for MapLiteral {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBrace)?;

        let mut entries = vec![];

        let end = loop {
            let key = match parser.current_token.take() {
                Some((_, Token::RBrace, end)) => {
                    parser.step();

                    break end;
                },
                Some((start, Token::Ident(value), end)) => {
                    parser.step();

                    Key { value, location: SrcSpan { start, end } }
                },
                Some((start, Token::String(parts), end)) => {
                    let location = SrcSpan { start, end };
                    let template = Template::from_parts(parts.clone(), location)?;

                    match template.as_plain_text() {
                        Some(value) => {
                            parser.step();

                            Key { value, location }
                        },
                        None => {
                            parser.current_token = Some((start, Token::String(parts), end));

                            return parse_error(ParseErrorType::InvalidMapKey, location);
                        }
                    }
                },
                Some(t) => {
                    parser.current_token = Some(t.clone());

                    return unexpected(t, vec!["a key".into(), "}".into()]);
                },
                None => return parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            };

            parser.expect_one(Token::Colon)?;

            let value = Expression::parse(parser)?;

            entries.push((key, value));

            if parser.check(&Token::Comma) {
                parser.step();
            }
        };

        Ok(Self {
            entries,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for MapLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<String>>();

        write!(f, "{{{}}}", entries.join(", "))
    }
}

// list -> [ [ <expr> { , <expr> } [,] ] ]
#[derive(Debug, Clone, PartialEq)]
pub struct ListLiteral {
    pub items: Vec<Expression>,
    pub location: SrcSpan
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ListLiteral {
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError> {
        let (start, _) = parser.expect_one(Token::LBracket)?;
        let (items, end) = parser.parse_sequence(Token::RBracket)?;

        Ok(Self {
            items,
            location: SrcSpan { start, end }
        })
    }
}

impl Display for ListLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(&self.items))
    }
}

// member -> <postfix> . <identifier> [ ( <args> ) ]
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub receiver: Box<Expression>,
    pub name: Identifier,
    // `None` for field access, `Some` for a method call
    pub arguments: Option<Vec<Expression>>,
    pub location: SrcSpan
}

impl Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.arguments {
            Some(arguments) => write!(f, "{}.{}({})", self.receiver, self.name, join(arguments)),
            None => write!(f, "{}.{}", self.receiver, self.name),
        }
    }
}

// index -> <postfix> [ <expr> ]
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub receiver: Box<Expression>,
    pub key: Box<Expression>,
    pub location: SrcSpan
}

impl Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.receiver, self.key)
    }
}
