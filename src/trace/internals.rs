#![cfg(feature = "std")]

use std::io::Write;

use crate::parser::{ParseStep, Start};

pub(crate) struct Depth {
    depth: usize,
    inc: bool,
}

impl Depth {
    pub(crate) fn new() -> Self {
        let depth = DEPTH.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let inc = true;
        Self { depth, inc }
    }
}

impl Drop for Depth {
    fn drop(&mut self) {
        if self.inc {
            let _ = DEPTH.fetch_sub(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}

impl std::ops::Deref for Depth {
    type Target = usize;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.depth
    }
}

static DEPTH: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

enum Severity {
    Commit,
    Advance,
    Success,
    Failure,
}

impl Severity {
    fn style(&self) -> anstyle::Style {
        match self {
            Self::Commit | Self::Success => {
                anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Green.into()))
            }
            Self::Advance => {
                anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Yellow.into()))
            }
            Self::Failure => anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Red.into())),
        }
    }
}

pub(crate) fn start<S, B>(depth: usize, name: &str, res: &Start<S, B>) {
    let (severity, status) = match res {
        Start::Pending(_) => (Severity::Advance, String::from("pending")),
        Start::Done(_) => (Severity::Success, String::from("done")),
        Start::Error(msg) => (Severity::Failure, format!("error: {msg}")),
    };
    write_line(depth, name, "initial", severity, &status);
}

pub(crate) fn step<S, B>(depth: usize, name: &str, phase: &str, res: &ParseStep<S, B>) {
    let (severity, status) = match res {
        ParseStep::Partial(n, _) => (Severity::Commit, format!("partial -{n}")),
        ParseStep::Continue(n, _) => (Severity::Advance, format!("continue -{n}")),
        ParseStep::Done(n, _) => (Severity::Success, format!("done -{n}")),
        ParseStep::Error(msg) => (Severity::Failure, format!("error: {msg}")),
    };
    write_line(depth, name, phase, severity, &status);
}

fn write_line(depth: usize, name: &str, phase: &str, severity: Severity, status: &str) {
    let gutter_style = anstyle::Style::new().bold();
    let status_style = severity.style();

    let (call_width, _) = column_widths();
    let call_column = format!("{:depth$}> {name}.{phase}", "");

    let writer = anstream::stderr();
    let mut writer = writer.lock();
    let _ = writeln!(
        writer,
        "{call_column:call_width$} {gutter_style}|{gutter_reset} {status_style}{status}{status_reset}",
        gutter_style = gutter_style.render(),
        gutter_reset = gutter_style.render_reset(),
        status_style = status_style.render(),
        status_reset = status_style.render_reset(),
    );
}

fn column_widths() -> (usize, usize) {
    let term_width = term_width();

    let min_call_width = 40;
    let min_status_width = 20;
    let decor_width = 3;
    let extra_width = term_width
        .checked_sub(min_call_width + min_status_width + decor_width)
        .unwrap_or_default();
    let call_width = min_call_width + 2 * extra_width / 3;
    let status_width = min_status_width + extra_width / 3;

    (call_width, status_width)
}

fn term_width() -> usize {
    columns_env().or_else(query_width).unwrap_or(80)
}

fn query_width() -> Option<usize> {
    use is_terminal_polyfill::IsTerminal;
    if std::io::stderr().is_terminal() {
        terminal_size::terminal_size().map(|(w, _h)| w.0.into())
    } else {
        None
    }
}

fn columns_env() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse::<usize>().ok())
}
