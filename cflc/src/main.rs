mod args;
mod cli;
mod logging;
mod repl;
mod tokens;

use std::{path::{Path, PathBuf}, process::ExitCode, time::Instant};

use clap::Parser;
use rayon::prelude::*;
use tracing::debug;

use args::{parse_argument, parse_literal};
use cfl_core::{Arguments, Error, Limits, Program, Value};
use cli::{print_entry, print_evaluated, print_evaluating, print_expanding};

#[derive(Parser)]
#[command(version, about = "Evaluates configuration programs")]
enum Command {
    /// Evaluates a program and prints the resulting value
    Eval {
        /// Path of source file
        path: PathBuf,
        /// Initial argument, may be repeated
        #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_argument)]
        args: Vec<(String, Value)>,
        /// Print a string result without quotes
        #[arg(long, default_value_t = false)]
        raw: bool,
        /// Maximum nesting of evaluations
        #[arg(long, default_value_t = Limits::default().max_depth)]
        max_depth: usize,
    },
    /// Evaluates a program once per value of one parameter, in parallel
    Matrix {
        /// Path of source file
        path: PathBuf,
        /// Name of the parameter to vary
        #[arg(short, long)]
        param: String,
        /// Comma separated values of the parameter
        #[arg(short, long, value_delimiter = ',', required = true)]
        values: Vec<String>,
        /// Argument shared by every entry, may be repeated
        #[arg(short, long = "arg", value_name = "NAME=VALUE", value_parser = parse_argument)]
        args: Vec<(String, Value)>,
    },
    /// Runs Read Eval Print Loop
    Repl,
    /// Runs Read Lex Print Loop
    Tokens,
}

fn main() -> ExitCode {
    logging::init_tracing();

    let result = match Command::parse() {
        Command::Eval { path, args, raw, max_depth } => {
            eval(&path, args.into_iter().collect(), raw, Limits { max_depth })
        },
        Command::Matrix { path, param, values, args } => {
            matrix(&path, &param, &values, args.into_iter().collect())
        },
        Command::Repl => repl::start().map_err(Error::from),
        Command::Tokens => tokens::start().map_err(Error::from),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let buf_writer = cli::stderr_buffer_writer();
            let mut buf = buf_writer.buffer();

            err.pretty(&mut buf);
            buf_writer
                .print(&buf)
                .expect("Writing error to stderr");

            ExitCode::FAILURE
        }
    }
}

fn load(path: &Path) -> Result<(String, Program), Error> {
    let src = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = src.len(), "loaded source");

    match Program::parse(&src) {
        Ok(program) => Ok((src, program)),
        Err(error) => Err(Error::Parse { path: path.to_path_buf(), src, error }),
    }
}

fn eval(path: &Path, args: Arguments, raw: bool, limits: Limits) -> Result<(), Error> {
    print_evaluating(&path.display().to_string());
    let start = Instant::now();

    let (src, program) = load(path)?;

    let value = program.evaluate_with(&args, limits)
        .map_err(|error| Error::Eval { path: path.to_path_buf(), src, error })?;

    print_evaluated(start.elapsed());

    match value {
        Value::String { value } if raw => println!("{value}"),
        value => println!("{value}"),
    }

    Ok(())
}

fn matrix(path: &Path, param: &str, values: &[String], args: Arguments) -> Result<(), Error> {
    print_evaluating(&path.display().to_string());
    print_expanding(param, values.len());
    let start = Instant::now();

    let (src, program) = load(path)?;

    debug!(threads = rayon::current_num_threads(), "expanding matrix");

    let results = values.par_iter()
        .map(|value| {
            let entry_start = Instant::now();
            let mut args = args.clone();
            args.insert(param.to_string(), parse_literal(value));

            (program.evaluate(&args), entry_start.elapsed())
        })
        .collect::<Vec<_>>();

    for (value, (result, duration)) in values.iter().zip(&results) {
        print_entry(param, value, *duration, result.is_err());
    }

    print_evaluated(start.elapsed());

    for (value, (result, _)) in values.iter().zip(results) {
        match result {
            Ok(entry) => println!("{param}={value}\t{entry}"),
            Err(error) => return Err(Error::Eval { path: path.to_path_buf(), src, error }),
        }
    }

    Ok(())
}
