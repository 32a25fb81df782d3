//! Terminal syntax highlighting for structured output

use anyhow::Result;
use syntect::easy::HighlightLines;
use syntect::highlighting::Style;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use two_face::theme::EmbeddedThemeName;
use two_face::{syntax, theme};

/// Highlight `text` as `extension` (json, toml, yaml) when stdout is a terminal;
/// returns it unchanged otherwise
pub fn highlight_for_terminal(text: &str, extension: &str) -> Result<String> {
    if !atty::is(atty::Stream::Stdout) {
        return Ok(text.to_string());
    }
    highlight(text, extension)
}

/// Highlight unconditionally with 24-bit terminal escapes
pub fn highlight(text: &str, extension: &str) -> Result<String> {
    let ps = syntax::extra_newlines();
    let ts = theme::extra();

    let syntax = ps
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let theme = ts.get(EmbeddedThemeName::Base16OceanDark);

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut highlighted = String::with_capacity(text.len() * 2);

    for line in LinesWithEndings::from(text) {
        let ranges: Vec<(Style, &str)> = highlighter.highlight_line(line, &ps)?;
        highlighted.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    highlighted.push_str("\x1b[0m");

    Ok(highlighted)
}
