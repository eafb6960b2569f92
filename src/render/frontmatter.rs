// src/render/frontmatter.rs
// =============================================================================
// Front matter extraction.
//
// A Markdown page may start with a YAML block:
//
//   ---
//   title: "Hello"
//   ---
//   # Body starts here
//
// The block must open on the very first line and close with `---` (or
// `...`) on a line of its own. Without an opening line there is simply no
// front matter and the whole text is the body.
// =============================================================================

use std::collections::BTreeMap;

use crate::error::{PagesError, Result};

/// Key/value metadata from the top of a Markdown page.
pub type FrontMatter = BTreeMap<String, serde_yaml::Value>;

const OPEN: &str = "---";
const CLOSE: [&str; 2] = ["---", "..."];

// Splits `source` into (front matter, body)
//
// Errors:
//   - the block is opened but never closed
//   - the block is not valid YAML, or not a mapping
pub fn extract_front_matter(source: &str) -> Result<(FrontMatter, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (first, mut rest) = split_line(source);
    if first.trim_end() != OPEN {
        return Ok((FrontMatter::new(), source));
    }

    let block_start = source.len() - rest.len();
    loop {
        if rest.is_empty() {
            return Err(PagesError::Parse("front matter is not closed".to_string()));
        }

        let line_start = source.len() - rest.len();
        let (line, after) = split_line(rest);
        if CLOSE.iter().any(|close| *close == line.trim_end()) {
            let yaml = &source[block_start..line_start];
            return Ok((parse_block(yaml)?, after));
        }
        rest = after;
    }
}

fn parse_block(yaml: &str) -> Result<FrontMatter> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }

    serde_yaml::from_str(yaml).map_err(|e| PagesError::Parse(format!("invalid front matter: {}", e)))
}

// Returns (line without its newline, everything after the newline)
fn split_line(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => (text, ""),
    }
}
