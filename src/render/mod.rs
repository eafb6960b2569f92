// src/render/mod.rs
// =============================================================================
// Turns Markdown pages into HTML documents.
//
// Submodules:
// - frontmatter: splits the YAML header off a Markdown document
// - markdown: renders the body and wraps it in a minimal HTML page
// =============================================================================

mod frontmatter;
mod markdown;

pub use markdown::{is_markdown, render_markdown};
