use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use termcolor::{Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Progress line kinds, printed to stderr so stdout carries only values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Evaluating,
    Expanding,
    Entry,
    Failed,
    Evaluated,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Self::Evaluating => "Evaluating",
            Self::Expanding => "Expanding",
            Self::Entry => "Entry",
            Self::Failed => "Failed",
            Self::Evaluated => "Evaluated",
        }
    }

    fn colour(self) -> Color {
        match self {
            Self::Evaluating => Color::Magenta,
            Self::Expanding => Color::Cyan,
            Self::Entry | Self::Evaluated => Color::Green,
            Self::Failed => Color::Red,
        }
    }
}

pub(crate) fn print_evaluating(path: &str) {
    print_status(Status::Evaluating, path)
}

pub(crate) fn print_expanding(param: &str, count: usize) {
    print_status(Status::Expanding, &format!("{param} over {count} values"))
}

/// One line per matrix entry, `failed` entries in red.
pub(crate) fn print_entry(param: &str, value: &str, duration: Duration, failed: bool) {
    let status = match failed {
        true => Status::Failed,
        false => Status::Entry,
    };

    print_status(status, &format!("{param}={value} in {}", seconds(duration)))
}

pub(crate) fn print_evaluated(duration: Duration) {
    print_status(Status::Evaluated, &format!("in {}", seconds(duration)))
}

fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn print_status(status: Status, text: &str) {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();

    write_status(&mut buffer, status, text).expect("print_status");
    buffer_writer.print(&buffer).expect("print_status");
}

fn write_status(buffer: &mut Buffer, status: Status, text: &str) -> std::io::Result<()> {
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(status.colour())),
    )?;
    write!(buffer, "{: >11}", status.label())?;
    buffer.reset()?;
    writeln!(buffer, " {text}")
}

pub(crate) fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(colour_choice(
        std::env::var_os("FORCE_COLOR").is_some_and(|force| !force.is_empty()),
        std::env::var_os("NO_COLOR").is_some_and(|no| !no.is_empty()),
        std::io::stderr().is_terminal(),
    ))
}

// FORCE_COLOR wins over NO_COLOR
fn colour_choice(forced: bool, disabled: bool, terminal: bool) -> ColorChoice {
    match (forced, disabled, terminal) {
        (true, _, _) => ColorChoice::Always,
        (false, true, _) | (false, false, false) => ColorChoice::Never,
        (false, false, true) => ColorChoice::Auto,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(status: Status, text: &str) -> String {
        let mut buffer = Buffer::no_color();

        match write_status(&mut buffer, status, text) {
            Ok(()) => String::from_utf8_lossy(buffer.as_slice()).into_owned(),
            Err(err) => panic!("writing status failed: {err}"),
        }
    }

    #[test]
    fn test_status_lines_are_right_aligned() {
        assert_eq!(render(Status::Entry, "os=linux in 0.01s"), "      Entry os=linux in 0.01s\n");
        assert_eq!(render(Status::Failed, "os=plan9 in 0.00s"), "     Failed os=plan9 in 0.00s\n");
        assert_eq!(render(Status::Evaluating, "ci.cfl"), " Evaluating ci.cfl\n");
    }

    #[test]
    fn test_seconds() {
        assert_eq!(seconds(Duration::from_millis(1250)), "1.25s");
        assert_eq!(seconds(Duration::ZERO), "0.00s");
    }

    #[test]
    fn test_colour_choice() {
        assert_eq!(colour_choice(true, true, false), ColorChoice::Always);
        assert_eq!(colour_choice(false, true, true), ColorChoice::Never);
        assert_eq!(colour_choice(false, false, false), ColorChoice::Never);
        assert_eq!(colour_choice(false, false, true), ColorChoice::Auto);
    }
}
