// src/policy/mod.rs
// =============================================================================
// This module decides which repositories and refs may be served.
//
// Two gates, checked in order:
// - allowance: coarse, from repository topics
//     <allowall topic>  -> every ref may be served
//     <pages topic>     -> only refs the repo's config allows
//     neither           -> nothing
// - repo config: fine grained, a TOML file `<pages>.toml` on the `<pages>`
//   branch listing the allowed refs ("*" = any)
//
// Submodules:
// - allowance: topic -> Allowance, plus the ref check
// - config: loading and parsing the per-repository config file
// =============================================================================

mod allowance;
mod config;

pub use allowance::{fetch_allowance, is_ref_allowed, Allowance};
pub use config::{load_config, RepoConfig};

pub const DEFAULT_PAGES_NAME: &str = "gitea-pages";
pub const DEFAULT_ALLOWALL_TOPIC: &str = "gitea-pages-allowall";

/// Names with special meaning to the pages server.
///
/// `pages` is at the same time the default repository name, the opt-in
/// topic, the branch pages are served from and the config file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNames {
    pub pages: String,
    pub allow_all: String,
}

impl ReservedNames {
    /// Empty names fall back to the defaults.
    pub fn new(pages: &str, allow_all: &str) -> Self {
        let pick = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        Self {
            pages: pick(pages, DEFAULT_PAGES_NAME),
            allow_all: pick(allow_all, DEFAULT_ALLOWALL_TOPIC),
        }
    }

    /// File holding the per-repository config, e.g. "gitea-pages.toml".
    pub fn config_file(&self) -> String {
        format!("{}.toml", self.pages)
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self::new(DEFAULT_PAGES_NAME, DEFAULT_ALLOWALL_TOPIC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_names_use_defaults() {
        let names = ReservedNames::new("", "");
        assert_eq!(names, ReservedNames::default());
        assert_eq!(names.config_file(), "gitea-pages.toml");
    }

    #[test]
    fn test_custom_names() {
        let names = ReservedNames::new("pages", "pages-all");
        assert_eq!(names.pages, "pages");
        assert_eq!(names.allow_all, "pages-all");
        assert_eq!(names.config_file(), "pages.toml");
    }
}
