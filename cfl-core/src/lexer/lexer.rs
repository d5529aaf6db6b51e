use super::error::{LexicalError, LexicalErrorType};
use super::token::{StringPart, Token};
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<Token> {
	Some(match word {
		"let" => Token::Let,
		"in" => Token::In,
		"true" => Token::True,
		"false" => Token::False,

		_ => return None
	})
}

fn is_ident_start(ch: char) -> bool {
	ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		self.skip_whitespace();

		let span = match self.ch {
			Some(ch) => match ch {
				'#' => return Ok(self.lex_comment()),
				'"' => return self.lex_string(),
				'{' => self.eat_one_char(Token::LBrace),
				'}' => self.eat_one_char(Token::RBrace),
				'[' => self.eat_one_char(Token::LBracket),
				']' => self.eat_one_char(Token::RBracket),
				'(' => self.eat_one_char(Token::LParen),
				')' => self.eat_one_char(Token::RParen),
				':' => self.eat_one_char(Token::Colon),
				',' => self.eat_one_char(Token::Comma),
				'.' => self.eat_one_char(Token::Dot),
				'=' if self.next_ch == Some('>') => self.eat_two_chars(Token::Arrow),
				'=' => self.eat_one_char(Token::Assign),
				'-' if matches!(self.next_ch, Some('0'..='9')) => return self.lex_number(),
				'0'..='9' => return self.lex_number(),
				c if is_ident_start(c) => return Ok(self.lex_ident()),
				c => {
					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: SrcSpan::from(self.position, self.next_position),
					});
				}
			},
			None => self.eat_one_char(Token::Eof)
		};

		Ok(span)
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;
		let next = self.input.next();

		self.position = self.next_position;
		self.ch = self.next_ch;
		self.next_position = match (next, self.ch) {
			(Some((pos, _)), _) => pos,
			(None, Some(current)) => self.position + current.len_utf8() as u32,
			(None, None) => self.position,
		};
		self.next_ch = next.map(|(_, c)| c);

		ch
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.ch, Some(ch) if ch.is_whitespace()) {
			self.next_char();
		}
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn eat_two_chars(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	fn lex_ident(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch.filter(|ch| is_ident_continue(*ch)) {
			ident.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		match str_to_keyword(&ident) {
			Some(keyword) => (start_pos, keyword, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos),
		}
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut value = String::new();

		if self.ch == Some('-') {
			value.push('-');
			self.next_char();
		}

		self.eat_digits(&mut value);

		// `1.trim()` is a method call on an integer, not a float
		let is_float = self.ch == Some('.') && matches!(self.next_ch, Some('0'..='9'));

		if is_float {
			value.push('.');
			self.next_char();
			self.eat_digits(&mut value);
		}

		let end_pos = self.position;
		let location = SrcSpan::from(start_pos, end_pos);

		let token = if is_float {
			match value.parse::<f64>() {
				Ok(value) => Token::Float(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location
				})
			}
		} else {
			match value.parse::<i64>() {
				Ok(value) => Token::Int(value),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberTooLarge,
					location
				})
			}
		};

		Ok((start_pos, token, end_pos))
	}

	fn eat_digits(&mut self, value: &mut String) {
		while let Some(ch) = self.ch.filter(char::is_ascii_digit) {
			value.push(ch);
			self.next_char();
		}
	}

	fn lex_comment(&mut self) -> Spanned {
		let start_pos = self.position;

		while !matches!(self.ch, Some('\n') | None) {
			self.next_char();
		}

		(start_pos, Token::Comment, self.position)
	}

	fn lex_string(&mut self) -> LexResult {
		let start_pos = self.position;

		self.next_char(); // opening quote

		if self.ch == Some('"') && self.next_ch == Some('"') {
			self.next_char();
			self.next_char();

			return self.lex_string_body(start_pos, true);
		}

		self.lex_string_body(start_pos, false)
	}

	fn lex_string_body(&mut self, start_pos: u32, block: bool) -> LexResult {
		let mut parts = vec![];
		let mut text = String::new();

		loop {
			match self.ch {
				None => {
					let error = if block {
						LexicalErrorType::UnterminatedBlockString
					} else {
						LexicalErrorType::UnterminatedString
					};

					return Err(LexicalError {
						error,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some('"') if !block => {
					self.next_char();
					break;
				},
				Some('"') if self.next_ch == Some('"') => {
					self.next_char();
					self.next_char();

					if self.ch == Some('"') {
						self.next_char();
						break;
					}

					text.push_str("\"\"");
				},
				Some('\n') if !block => {
					return Err(LexicalError {
						error: LexicalErrorType::UnterminatedString,
						location: SrcSpan::from(start_pos, self.position)
					});
				},
				Some('\\') if !block => text.push(self.lex_escape()?),
				Some('$') if self.next_ch == Some('{') => {
					if !text.is_empty() {
						parts.push(StringPart::Text(std::mem::take(&mut text)));
					}

					parts.push(StringPart::Code(self.lex_interpolation()?));
				},
				Some(ch) => {
					text.push(ch);
					self.next_char();
				}
			}
		}

		if !text.is_empty() {
			parts.push(StringPart::Text(text));
		}

		Ok((start_pos, Token::String(parts), self.position))
	}

	fn lex_escape(&mut self) -> Result<char, LexicalError> {
		let start_pos = self.position;

		self.next_char(); // skip backslash

		let escaped = match self.ch {
			Some('n') => '\n',
			Some('t') => '\t',
			Some('r') => '\r',
			Some('"') => '"',
			Some('\\') => '\\',
			Some('$') => '$',
			Some(ch) => return Err(LexicalError {
				error: LexicalErrorType::UnknownEscape { ch },
				location: SrcSpan::from(start_pos, self.next_position)
			}),
			None => return Err(LexicalError {
				error: LexicalErrorType::UnterminatedString,
				location: SrcSpan::from(start_pos, self.position)
			}),
		};

		self.next_char();

		Ok(escaped)
	}

	/// Lexes the tokens of a `${...}` span up to its matching `}`.
	fn lex_interpolation(&mut self) -> Result<Vec<Spanned>, LexicalError> {
		let start_pos = self.position;

		self.next_char(); // $
		self.next_char(); // {

		let mut tokens = vec![];
		let mut depth = 0usize;

		loop {
			let (start, token, end) = self.next_token()?;

			match token {
				Token::Eof => return Err(LexicalError {
					error: LexicalErrorType::UnterminatedInterpolation,
					location: SrcSpan::from(start_pos, end)
				}),
				Token::Comment => continue,
				Token::RBrace if depth == 0 => {
					tokens.push((start, Token::Eof, start));

					return Ok(tokens);
				},
				Token::RBrace => depth -= 1,
				Token::LBrace => depth += 1,
				_ => {}
			}

			tokens.push((start, token, end));
		}
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		let token = self.next_token();

		Some(token)
	}
}

pub fn lex(src: &str) -> Lexer<impl Iterator<Item = (u32, char)> + '_> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
}
