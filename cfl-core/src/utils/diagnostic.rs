use std::path::PathBuf;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label as CodespanLabel, LabelStyle};
use codespan_reporting::files::SimpleFiles;
use termcolor::Buffer;

use super::src_span::SrcSpan;

pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan
}

impl Label {
    pub fn to_codespan_label(&self, file_id: usize, label_style: LabelStyle) -> CodespanLabel<usize> {
        let label = CodespanLabel::new(label_style, file_id, self.span.range());

        match &self.text {
            None => label,
            Some(text) => label.with_message(text.clone()),
        }
    }
}

pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub label: Label,
    pub extra_labels: Vec<Label>,
}

impl Location<'_> {
    fn name(&self) -> String {
        match self.path.as_os_str().is_empty() {
            true => "<input>".into(),
            false => self.path.display().to_string(),
        }
    }
}

/// A failure ready for the terminal: a title, an optional labelled source span and
/// trailing notes.
pub struct Diagnostic<'a> {
    pub title: String,
    pub notes: Vec<String>,
    pub location: Option<Location<'a>>
}

impl<'a> Diagnostic<'a> {
    pub fn write(&self, buf: &mut Buffer) {
        match &self.location {
            Some(location) => self.write_span(location, buf),
            None => self.write_title(buf),
        }
    }

    fn write_span(&self, location: &Location, buf: &mut Buffer) {
        let mut files = SimpleFiles::new();
        let file_id = files.add(location.name(), location.src);

        let labels = std::iter::once(location.label.to_codespan_label(file_id, LabelStyle::Primary))
            .chain(location.extra_labels.iter()
                .map(|label| label.to_codespan_label(file_id, LabelStyle::Secondary)))
            .collect();

        let diagnostic = CodespanDiagnostic::error()
            .with_message(&self.title)
            .with_labels(labels)
            .with_notes(self.notes.clone());

        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(buf, &config, &files, &diagnostic)
            .expect("write_diagnostic");
    }

    fn write_title(&self, buf: &mut Buffer) {
        use std::io::Write;
        use termcolor::{Color, ColorSpec, WriteColor};

        buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Red)))
            .expect("write_title_color1");
        write!(buf, "error").expect("write_title_kind");

        buf.set_color(ColorSpec::new().set_bold(true))
            .expect("write_title_color2");
        writeln!(buf, ": {}", self.title).expect("write_title_title");

        buf.set_color(&ColorSpec::new())
            .expect("write_title_reset");

        for note in &self.notes {
            writeln!(buf, "  = {note}").expect("write_title_note");
        }
    }
}
