// src/policy/allowance.rs
// =============================================================================
// Topic based allowance and the final "may this ref be served?" check.
//
// The allowance is looked up fresh for every request, so adding or removing
// a topic in Gitea takes effect immediately.
// =============================================================================

use super::{RepoConfig, ReservedNames};
use crate::gitea::ContentSource;

/// How much of a repository may be served.
///
/// Ordered: `None < LimitedToPagesBranch < All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Allowance {
    None,
    /// Only refs the repository config allows
    LimitedToPagesBranch,
    /// Any ref, config or not
    All,
}

// Computes the allowance from a topic list
//
// The allow-all topic wins over the pages topic when both are present.
pub fn allowance_for(topics: &[String], names: &ReservedNames) -> Allowance {
    if topics.iter().any(|t| *t == names.allow_all) {
        Allowance::All
    } else if topics.iter().any(|t| *t == names.pages) {
        Allowance::LimitedToPagesBranch
    } else {
        Allowance::None
    }
}

// Fetches topics for owner/repo and computes the allowance
//
// Fails closed: if the topics cannot be listed (missing repo, network
// trouble, ...) the answer is Allowance::None.
pub async fn fetch_allowance<S>(source: &S, owner: &str, repo: &str, names: &ReservedNames) -> Allowance
where
    S: ContentSource + ?Sized,
{
    match source.list_topics(owner, repo).await {
        Ok(topics) => allowance_for(&topics, names),
        Err(e) => {
            tracing::debug!(owner, repo, error = %e, "listing topics failed, treating as not allowed");
            Allowance::None
        }
    }
}

// Whether `git_ref` may be served
//
// Parameters:
//   git_ref: the requested ref, compared verbatim
//   level: allowance of the repository
//   config: the repository config, None when it could not be loaded
pub fn is_ref_allowed(git_ref: &str, level: Allowance, config: Option<&RepoConfig>) -> bool {
    if level == Allowance::All {
        return true;
    }

    match config {
        Some(config) => config.allows(git_ref),
        None => false,
    }
}
