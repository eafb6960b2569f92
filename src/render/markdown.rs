// src/render/markdown.rs
// =============================================================================
// This module renders Markdown pages to HTML.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Ships an HTML writer that turns the events straight into markup
//
// The rendered body is wrapped in a bare-bones HTML page whose <h1> is the
// `title` from the front matter (empty when there is none).
//
// Rust concepts:
// - Bitflags: building up parser Options one flag at a time
// - String building: push_str / push_html into one buffer
// =============================================================================

use pulldown_cmark::{escape::escape_html, html, Options, Parser};

use super::frontmatter::{extract_front_matter, FrontMatter};
use crate::error::{PagesError, Result};

const MARKDOWN_EXTENSION: &str = ".md";

// Whether a file path should go through the Markdown renderer
pub fn is_markdown(file_path: &str) -> bool {
    file_path.ends_with(MARKDOWN_EXTENSION)
}

// Renders a raw Markdown file into a complete HTML document
//
// Parameters:
//   raw: the file exactly as fetched from the repository
//
// Returns: the HTML document as bytes
//
// Example input:
//   "---\ntitle: Hi\n---\n# Hello"
//
// Example output:
//   "<!DOCTYPE html>\n<html>\n<body>\n<h1>Hi</h1><h1>Hello</h1>\n</body></html>"
pub fn render_markdown(raw: &[u8]) -> Result<Vec<u8>> {
    let source = std::str::from_utf8(raw)
        .map_err(|e| PagesError::Parse(format!("markdown is not utf-8: {}", e)))?;

    let (meta, body) = extract_front_matter(source)?;

    let mut page = String::with_capacity(body.len() * 2 + 64);
    page.push_str("<!DOCTYPE html>\n<html>\n<body>\n<h1>");
    escape_html(&mut page, &title_of(&meta))
        .map_err(|e| PagesError::Parse(format!("cannot write title: {}", e)))?;
    page.push_str("</h1>");

    // GitHub-ish extensions people expect from a README
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    html::push_html(&mut page, Parser::new_ext(body, options));

    page.push_str("</body></html>");

    Ok(page.into_bytes())
}

// Reads the title as text; numbers and booleans are printed,
// anything else counts as no title
fn title_of(meta: &FrontMatter) -> String {
    match meta.get("title") {
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(serde_yaml::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does html::push_html do?
//    - It walks the parser's event stream and appends HTML to a String
//    - No intermediate tree is built, the Markdown is streamed straight out
//
// 2. Why escape the title?
//    - Front matter is written by whoever owns the repository
//    - Without escaping a title like "<script>" would become live markup
// -----------------------------------------------------------------------------
