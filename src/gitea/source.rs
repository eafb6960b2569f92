// src/gitea/source.rs
// The three remote operations the pages resolver depends on.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SourceError;

#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Topics attached to `owner/repo`.
    async fn list_topics(&self, owner: &str, repo: &str) -> Result<Vec<String>, SourceError>;

    /// Whether `branch` exists in `owner/repo`.
    ///
    /// Any failure reads as `false`: a missing branch and an unreachable
    /// server look the same to callers.
    async fn has_branch(&self, owner: &str, repo: &str, branch: &str) -> bool;

    /// Raw bytes of `file_path` at `git_ref`, never an LFS pointer.
    ///
    /// An empty `git_ref` means the repository's default branch.
    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        file_path: &str,
        git_ref: &str,
    ) -> Result<Bytes, SourceError>;
}
