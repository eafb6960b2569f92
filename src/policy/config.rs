// src/policy/config.rs
// =============================================================================
// The per-repository config file.
//
// It lives on the pages branch of the repository itself, so the people who
// own the repo decide which refs get published:
//
//   # gitea-pages.toml
//   allowedrefs = ["main", "docs-preview"]
//
// "*" allows every ref. Each request parses its own copy; nothing is shared
// between requests, so a reload can never be observed half-way.
// =============================================================================

use serde::Deserialize;

use super::ReservedNames;
use crate::error::{PagesError, Result, SourceError};
use crate::gitea::ContentSource;

pub const WILDCARD_REF: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoConfig {
    #[serde(rename = "allowedrefs", default)]
    pub allowed_refs: Vec<String>,
}

impl RepoConfig {
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(|e| PagesError::Parse(format!("config is not utf-8: {}", e)))?;
        toml::from_str(text).map_err(|e| PagesError::Parse(format!("invalid config: {}", e)))
    }

    /// Listed verbatim or covered by the wildcard.
    pub fn allows(&self, git_ref: &str) -> bool {
        self.allowed_refs.iter().any(|r| r == git_ref || r == WILDCARD_REF)
    }
}

// Loads `<pages>.toml` from the `<pages>` branch of owner/repo
//
// Returns:
//   Ok(Some(config)) when the file exists and parses
//   Ok(None) when the file (or branch, or repo) does not exist
//   Err(..) for remote failures and malformed files
pub async fn load_config<S>(source: &S, owner: &str, repo: &str, names: &ReservedNames) -> Result<Option<RepoConfig>>
where
    S: ContentSource + ?Sized,
{
    match source.fetch_raw(owner, repo, &names.config_file(), &names.pages).await {
        Ok(raw) => RepoConfig::parse(&raw).map(Some),
        Err(SourceError::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_refs() {
        let cfg = RepoConfig::parse(br#"allowedrefs = ["main"]"#).unwrap();
        assert_eq!(cfg.allowed_refs, vec!["main".to_string()]);
        assert!(cfg.allows("main"));
        assert!(!cfg.allows("dev"));
    }

    #[test]
    fn test_missing_key_is_empty_list() {
        let cfg = RepoConfig::parse(b"# nothing here\n").unwrap();
        assert!(cfg.allowed_refs.is_empty());
        assert!(!cfg.allows("main"));
    }

    #[test]
    fn test_wildcard() {
        let cfg = RepoConfig::parse(br#"allowedrefs = ["*"]"#).unwrap();
        assert!(cfg.allows("whatever"));
    }

    #[test]
    fn test_malformed_config() {
        let err = RepoConfig::parse(b"allowedrefs = [\"main\"").unwrap_err();
        assert!(matches!(err, PagesError::Parse(_)));

        let err = RepoConfig::parse(b"allowedrefs = \"main\"").unwrap_err();
        assert!(matches!(err, PagesError::Parse(_)));
    }
}
