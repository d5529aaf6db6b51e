use std::{io::Write, path::PathBuf};

use cfl_core::{
    lexer::prelude::{lex, Token},
    Environment, Error, Limits, Program,
};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	ctrlc::set_handler(|| {
		println!();
		std::process::exit(130);
	})
	.map_err(std::io::Error::other)?;

	let stdin = std::io::stdin();
	let mut session = Environment::new();

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
			".env" => println!("{}", session.names().join(" ")),
			_ => {
				let (name, src) = split_binding(input);

				match eval_line(src, &session) {
					Ok(value) => match name {
						Some(name) => session = session.extend(name, value),
						None => println!("{value}"),
					},
					Err(err) => {
						let buf_writer = crate::cli::stderr_buffer_writer();
						let mut buf = buf_writer.buffer();

						err.pretty(&mut buf);
						buf_writer
							.print(&buf)
							.expect("Writing error to stderr");
					}
				}
			}
		}
	}
}

/// `name = expr` binds the result for the following lines.
fn split_binding(input: &str) -> (Option<String>, &str) {
	let mut tokens = lex(input);

	match (tokens.next_token(), tokens.next_token()) {
		(Ok((_, Token::Ident(name), _)), Ok((_, Token::Assign, end))) => {
			(Some(name), &input[end as usize..])
		},
		_ => (None, input),
	}
}

fn eval_line(src: &str, session: &Environment) -> Result<cfl_core::Value, Error> {
	let path = PathBuf::from("<repl>");

	let program = Program::parse(src).map_err(|error| Error::Parse {
		path: path.clone(),
		src: src.to_string(),
		error
	})?;

	program.evaluate_in(session, Limits::default()).map_err(|error| Error::Eval {
		path,
		src: src.to_string(),
		error
	})
}

#[cfg(test)]
mod tests {
	use super::split_binding;

	#[test]
	fn test_split_binding() {
		assert_eq!(split_binding("os = \"linux\""), (Some("os".to_string()), " \"linux\""));
		assert_eq!(split_binding("f = (x) => x"), (Some("f".to_string()), " (x) => x"));
		assert_eq!(split_binding("os"), (None, "os"));
		assert_eq!(split_binding("(x) => x"), (None, "(x) => x"));
		assert_eq!(split_binding("let x = 1 in x"), (None, "let x = 1 in x"));
	}
}
