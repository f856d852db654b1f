pub mod log_pane;
pub mod prompt;
pub mod status_line;

pub use log_pane::LogPane;
pub use prompt::{InputLine, LineEvent, PromptLine};
pub use status_line::StatusLine;

use unicode_width::UnicodeWidthChar;

/// Longest prefix of `text` that fits in `width` cells.
///
/// Never splits a character; a wide character that would straddle the edge
/// is dropped.
pub fn fit_to_width(text: &str, width: u16) -> &str {
    let mut used = 0usize;
    for (idx, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > usize::from(width) {
            return &text[..idx];
        }
    }
    text
}

/// `text` cut to `width` cells and right-padded with `fill` up to it.
pub fn pad_to_width(text: &str, width: u16, fill: char) -> String {
    let fitted = fit_to_width(text, width);
    let used = unicode_width::UnicodeWidthStr::width(fitted);
    let fill_width = fill.width().unwrap_or(1).max(1);
    let missing = usize::from(width).saturating_sub(used) / fill_width;

    let mut line = String::with_capacity(fitted.len() + missing);
    line.push_str(fitted);
    line.extend(std::iter::repeat_n(fill, missing));
    line
}
