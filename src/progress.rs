use console::Term;
use std::io::{self, Write};

use crate::cli::ProgressMode;

pub const DEFAULT_WIDTH: usize = 80;

/// Receives one update before each archive is inspected and a final
/// `finish` once the scan loop is done.
pub trait ProgressSink: Send {
    fn update(&mut self, current: usize, total: usize, label: &str);

    fn finish(&mut self);

    /// Removes any partially drawn status so another message can be printed.
    fn clear(&mut self) {}
}

pub fn status_line(current: usize, total: usize, label: &str) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        current as f64 / total as f64 * 100.0
    };
    format!("🔎 Searching [{current}/{total}] ({percent:.1}%) in: {label} ...")
}

/// Redraws a single status line in place with carriage return + line clear.
#[derive(Debug)]
pub struct TerminalProgress<W: Write + Send> {
    out: W,
    width: usize,
}

impl TerminalProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), terminal_width())
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressSink for TerminalProgress<W> {
    fn update(&mut self, current: usize, total: usize, label: &str) {
        let line = status_line(current, total, label);
        // One column short so the terminal never wraps the line.
        let line = console::truncate_str(&line, self.width.saturating_sub(1).max(1), "…");
        let _ = write!(self.out, "\r\x1b[K{line}");
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out);
        let _ = self.out.flush();
    }

    fn clear(&mut self) {
        let _ = write!(self.out, "\r\x1b[K");
        let _ = self.out.flush();
    }
}

/// Appends a status line every `step` archives, plus the first and last.
#[derive(Debug)]
pub struct PlainProgress<W: Write + Send> {
    out: W,
    step: Option<usize>,
}

impl PlainProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> PlainProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out, step: None }
    }

    pub fn with_step(out: W, step: usize) -> Self {
        Self {
            out,
            step: Some(step.max(1)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressSink for PlainProgress<W> {
    fn update(&mut self, current: usize, total: usize, label: &str) {
        let step = self.step.unwrap_or_else(|| (total / 10).max(1));
        if current == 1 || current == total || current % step == 0 {
            let _ = writeln!(self.out, "{}", status_line(current, total, label));
        }
    }

    fn finish(&mut self) {
        let _ = self.out.flush();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenProgress;

impl ProgressSink for HiddenProgress {
    fn update(&mut self, _current: usize, _total: usize, _label: &str) {}

    fn finish(&mut self) {}
}

pub fn terminal_width() -> usize {
    width_from(Term::stdout().size_checked())
}

/// Columns from a `(rows, cols)` terminal size, `DEFAULT_WIDTH` when unknown.
fn width_from(size: Option<(u16, u16)>) -> usize {
    size.map(|(_, cols)| cols as usize)
        .filter(|&cols| cols > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

pub fn sink_for(mode: ProgressMode) -> Box<dyn ProgressSink> {
    match mode {
        ProgressMode::Auto if Term::stdout().is_term() => Box::new(TerminalProgress::stdout()),
        ProgressMode::Auto | ProgressMode::Plain => Box::new(PlainProgress::stdout()),
        ProgressMode::None => Box::new(HiddenProgress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn status_line_shows_index_total_percent_and_name() {
        assert_eq!(
            status_line(1, 3, "a.jar"),
            "🔎 Searching [1/3] (33.3%) in: a.jar ..."
        );
        assert_eq!(
            status_line(3, 3, "c.jar"),
            "🔎 Searching [3/3] (100.0%) in: c.jar ..."
        );
    }

    #[test]
    fn terminal_redraws_in_place_and_ends_with_newline() {
        let mut sink = TerminalProgress::new(Vec::new(), 200);
        sink.update(1, 2, "a.jar");
        sink.update(2, 2, "b.jar");
        sink.finish();

        let out = text(sink.into_inner());
        assert_eq!(
            out,
            "\r\x1b[K🔎 Searching [1/2] (50.0%) in: a.jar ...\
             \r\x1b[K🔎 Searching [2/2] (100.0%) in: b.jar ...\n"
        );
        assert_eq!(out.matches('\n').count(), 1);
    }

    #[test]
    fn terminal_truncates_to_width() {
        let mut sink = TerminalProgress::new(Vec::new(), 20);
        sink.update(1, 1, "a-very-long-archive-name-1.2.3.jar");

        let out = text(sink.into_inner());
        let drawn = out.trim_start_matches("\r\x1b[K");
        assert!(console::measure_text_width(drawn) <= 19);
        assert!(drawn.ends_with('…'));
    }

    #[test]
    fn width_falls_back_to_eighty_columns() {
        assert_eq!(width_from(None), 80);
        assert_eq!(width_from(Some((24, 0))), 80);
        assert_eq!(width_from(Some((24, 132))), 132);
    }

    #[test]
    fn terminal_clear_erases_current_line() {
        let mut sink = TerminalProgress::new(Vec::new(), 80);
        sink.clear();
        assert_eq!(text(sink.into_inner()), "\r\x1b[K");
    }

    #[test]
    fn plain_prints_periodic_lines_without_escapes() {
        let mut sink = PlainProgress::with_step(Vec::new(), 2);
        for i in 1..=5 {
            sink.update(i, 5, &format!("{i}.jar"));
        }
        sink.finish();

        let out = text(sink.into_inner());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("[1/5]"));
        assert!(lines[1].contains("[2/5]"));
        assert!(lines[2].contains("[4/5]"));
        assert!(lines[3].contains("[5/5]"));
        assert!(!out.contains('\x1b'));
    }
}
