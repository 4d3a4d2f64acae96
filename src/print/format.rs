//! Fixed-width, optionally styled text columns.

use lazy_static::lazy_static;
use regex::Regex;
use yansi::{Color, Style};

/// Marks truncated column content and keeps it apart from the next column.
const ELLIPSIS: &str = "... ";

lazy_static! {
    static ref ANSI_ESCAPE: Regex = Regex::new(r"\x1b\[(?:\d+(?:;\d+)*)?m").unwrap();
    static ref LINE_BREAKS: Regex = Regex::new(r"[ \t]*[\r\n]+[ \t]*").unwrap();
}

/// Color and weight of a piece of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub bold: bool,
}

impl TextStyle {
    pub fn bold() -> Self {
        TextStyle {
            color: None,
            bold: true,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.color.is_none() && !self.bold
    }

    fn to_yansi(self) -> Style {
        let style = match self.color {
            Some(color) => Style::new(color),
            None => Style::default(),
        };
        if self.bold {
            style.bold()
        } else {
            style
        }
    }
}

/// Number of characters in `text`, not counting color and weight escape sequences.
pub fn measure_printable_width(text: &str) -> usize {
    ANSI_ESCAPE.replace_all(text, "").chars().count()
}

/// Wraps `text` in the escape sequences for `style`.
///
/// Returns `text` unchanged if the style is plain or the terminal does not support ANSI.
pub fn format_string(text: &str, style: TextStyle, ansi: bool) -> String {
    if !ansi || style.is_plain() {
        text.to_string()
    } else {
        style.to_yansi().paint(text).to_string()
    }
}

/// Pads or truncates `text` to exactly `width` printable characters.
///
/// Truncated text ends in `"... "`. Escape sequences are never cut,
/// only printable characters are dropped.
pub fn column(text: &str, width: usize) -> String {
    let printable = measure_printable_width(text);
    if printable < width {
        return format!("{}{}", text, " ".repeat(width - printable));
    }
    if width < ELLIPSIS.len() {
        return ELLIPSIS[..width].to_string();
    }

    let keep = width - ELLIPSIS.len();
    let mut out = String::with_capacity(text.len());
    let mut kept = 0;
    let mut last = 0;
    for escape in ANSI_ESCAPE.find_iter(text) {
        kept += push_chars(&mut out, &text[last..escape.start()], keep - kept);
        out.push_str(escape.as_str());
        last = escape.end();
    }
    push_chars(&mut out, &text[last..], keep - kept);
    out.push_str(ELLIPSIS);
    out
}

/// A [`column`] wrapped as a whole in `style`.
pub fn styled_column(text: &str, width: usize, style: TextStyle, ansi: bool) -> String {
    format_string(&column(text, width), style, ansi)
}

/// Replaces line breaks, and the blanks around them, with a single space.
pub fn collapse_lines(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").into_owned()
}

fn push_chars(out: &mut String, segment: &str, max: usize) -> usize {
    let mut count = 0;
    for c in segment.chars().take(max) {
        out.push(c);
        count += 1;
    }
    count
}
