/// Piece of a string literal as it appeared in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Text(String),
    // tokens of a `${...}` span, terminated by `Token::Eof`
    Code(Vec<(u32, Token, u32)>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // [A-Za-z_][A-Za-z0-9_-]*
    Ident(String),
    Int(i64),
    Float(f64),
    // "..." or """...""", with interpolation spans already lexed
    String(Vec<StringPart>),
    // # to end of line
    Comment,

    // Keywords
    Let,
    In,
    True,
    False,

    // Punctuation
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    LParen,   // (
    RParen,   // )
    Colon,    // :
    Comma,    // ,
    Assign,   // =
    Arrow,    // =>
    Dot,      // .

    Eof,
}

impl Token {
    pub fn is_reserved_word(&self) -> bool {
        matches!(self, Token::Let | Token::In | Token::True | Token::False)
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(name) => name.clone(),
            Token::Int(value) => value.to_string(),
            Token::Float(value) => value.to_string(),
            Token::String(_) => "string".into(),
            Token::Comment => "comment".into(),

            Token::Let => "let".into(),
            Token::In => "in".into(),
            Token::True => "true".into(),
            Token::False => "false".into(),

            Token::LBrace => "{".into(),
            Token::RBrace => "}".into(),
            Token::LBracket => "[".into(),
            Token::RBracket => "]".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Colon => ":".into(),
            Token::Comma => ",".into(),
            Token::Assign => "=".into(),
            Token::Arrow => "=>".into(),
            Token::Dot => ".".into(),

            Token::Eof => "end of input".into(),
        }
    }

    /// Token class as used in "found ..." messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Int(_) | Token::Float(_) => "a number".to_string(),
            Token::Ident(name) => format!("the identifier `{name}`"),
            Token::String(_) => "a string".to_string(),
            Token::Eof => "the end of input".to_string(),
            _ if self.is_reserved_word() => format!("the keyword `{}`", self.as_literal()),
            _ => format!("`{}`", self.as_literal()),
        }
    }
}
