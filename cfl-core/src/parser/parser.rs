use crate::{lexer::prelude::{lex, LexResult, LexicalError, Spanned, Token}, utils::prelude::SrcSpan};
use super::error::{ParseError, ParseErrorType};
use super::ast::{Expression, Parsed};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError>;
}

/// Token source for re-parsing the already lexed contents of a `${...}` span.
pub type Replay = std::iter::Map<std::vec::IntoIter<Spanned>, fn(Spanned) -> LexResult>;

pub fn replay(tokens: Vec<Spanned>) -> Replay {
    tokens.into_iter().map(Ok as fn(Spanned) -> LexResult)
}

pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Option<Spanned>,
    pub next_token: Option<Spanned>,
    pub comments: Vec<SrcSpan>,
    pub lex_errors: Vec<LexicalError>,

    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: None,
            next_token: None,
            comments: vec![],
            lex_errors: vec![],

            tokens: input,
        };

        parser.step();
        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    pub fn next_token(&mut self) -> Option<Spanned> {
        let t = self.current_token.take();
        let mut next = None;

        // the first lexical error ends the token stream
        while self.lex_errors.is_empty() {
            match self.tokens.next() {
                Some(Ok((start, Token::Comment, end))) => {
                    self.comments.push(SrcSpan { start, end })
                },
                Some(Err(err)) => {
                    self.lex_errors.push(err);
                },
                Some(Ok(tok)) => {
                    next = Some(tok);

                    break;
                },
                None => {
                    break;
                }
            }
        }

        self.current_token = self.next_token.take();
        self.next_token = next.take();

        t
    }

    pub fn check(&self, token: &Token) -> bool {
        matches!(&self.current_token, Some((_, tok, _)) if tok == token)
    }

    pub fn peek_is(&self, token: &Token) -> bool {
        matches!(&self.next_token, Some((_, tok, _)) if tok == token)
    }

    pub fn current_start(&self) -> u32 {
        match &self.current_token {
            Some((start, _, _)) => *start,
            None => 0,
        }
    }

    pub fn parse(&mut self) -> Result<Parsed, ParseError> {
        let expression = Expression::parse(self)
            .and_then(|expression| {
                self.expect_one(Token::Eof)?;
                Ok(expression)
            });

        if let Some(error) = self.lex_errors.first() {
            return parse_error(
                ParseErrorType::LexError { error: *error },
                error.location
            );
        }

        Ok(Parsed {
            expression: expression?,
            comments: std::mem::take(&mut self.comments)
        })
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        match self.current_token.take() {
            Some((start, tok, end)) if tok == token => {
                self.step();
                Ok((start, end))
            },
            Some(t) => {
                self.current_token = Some(t.clone());

                unexpected(t, vec![token.as_literal()])
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }

    pub fn expect_ident(&mut self) -> Result<(u32, String, u32), ParseError> {
        match self.current_token.take() {
            Some((start, Token::Ident(value), end)) => {
                self.step();
                Ok((start, value, end))
            },
            Some(t) => {
                let (start, token, end) = t.clone();
                self.current_token = Some(t);

                match token {
                    Token::Eof => parse_error(ParseErrorType::UnexpectedEof, SrcSpan { start, end }),
                    _ => parse_error(ParseErrorType::ExpectedIdent, SrcSpan { start, end }),
                }
            },
            None => parse_error(
                ParseErrorType::UnexpectedEof,
                SrcSpan { start: 0, end: 0 }
            )
        }
    }

    /// Parses `expr ("," expr)* ","? close`, the opening delimiter already consumed.
    /// Returns the items and the end of the closing delimiter.
    pub fn parse_sequence(&mut self, close: Token) -> Result<(Vec<Expression>, u32), ParseError> {
        let mut items = vec![];

        loop {
            if let Some((_, tok, end)) = &self.current_token {
                if *tok == close {
                    let end = *end;
                    self.step();

                    return Ok((items, end));
                }
            }

            items.push(Expression::parse(self)?);

            match self.current_token.take() {
                Some((_, Token::Comma, _)) => self.step(),
                Some((_, tok, end)) if tok == close => {
                    self.step();

                    return Ok((items, end));
                },
                Some(t) => {
                    self.current_token = Some(t.clone());

                    return unexpected(t, vec![",".into(), close.as_literal()]);
                },
                None => return parse_error(
                    ParseErrorType::UnexpectedEof,
                    SrcSpan { start: 0, end: 0 }
                )
            }
        }
    }
}

pub fn parse_module(src: &str) -> Result<Parsed, ParseError> {
    let mut parser = Parser::new(lex(src));
    let parsed = parser.parse()?;

    Ok(parsed)
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}

pub fn unexpected<T>((start, token, end): Spanned, expected: Vec<String>) -> Result<T, ParseError> {
    let span = SrcSpan { start, end };

    match token {
        Token::Eof => parse_error(ParseErrorType::UnexpectedEof, span),
        token => parse_error(ParseErrorType::UnexpectedToken { token, expected }, span),
    }
}
