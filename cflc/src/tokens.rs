use std::io::Write;

use cfl_core::lexer::prelude::{lex, StringPart, Token};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			return Ok(());
		}

		let input = input.trim_end_matches(['\n', '\r']);

		match input {
			"" => {},
			".exit" => return Ok(()),
			_ => {
				let mut lexer = lex(input);

				loop {
					match lexer.next_token() {
						Ok((_, Token::Eof, _)) => break,
						Ok(spanned) => print_token(&spanned, 0),
						Err(err) => {
							let (message, hints) = err.details();

							println!("[at {}] Lexical Error: {}", err.location, message);
							if !hints.is_empty() {
								println!("{}", hints.join("\n"));
							}
							break;
						}
					}
				}
			}
		}
	}
}

fn print_token((start, token, end): &(u32, Token, u32), indent: usize) {
	let pad = "  ".repeat(indent);

	match token {
		Token::String(parts) => {
			println!("{pad}{start}..{end} String");

			for part in parts {
				match part {
					StringPart::Text(text) => println!("{pad}  Text({text:?})"),
					StringPart::Code(tokens) => tokens.iter()
						.filter(|(_, token, _)| *token != Token::Eof)
						.for_each(|spanned| print_token(spanned, indent + 1)),
				}
			}
		},
		token => println!("{pad}{start}..{end} {token:?}"),
	}
}
