// src/content.rs
// =============================================================================
// This module ties everything together: given a resolved request target it
// decides whether the file may be served and, if so, fetches (and maybe
// renders) it.
//
// Steps, in order:
// 1. Fill in defaults: empty repo -> pages repo, empty path -> index.html
// 2. Attempt A: topic allowance of the requested repository
// 3. Attempt B (only when A gives nothing, only in compatibility mode):
//    the first path segment was not a repository after all, so retry
//    against the pages repository with that segment put back on the path
// 4. Load the repository config from the pages branch
// 5. Pick the ref: a pages repository without config always serves the
//    pages branch, everything else must pass the allowlist
// 6. Fetch the file, render it if it is Markdown
//
// Every "no" along the way is PagesError::NotFound, whatever the reason.
// =============================================================================

use bytes::Bytes;

use crate::error::{PagesError, Result};
use crate::gitea::ContentSource;
use crate::policy::{fetch_allowance, is_ref_allowed, load_config, Allowance, RepoConfig, ReservedNames};
use crate::render::{is_markdown, render_markdown};
use crate::request::RequestTarget;

const INDEX_FILE: &str = "index.html";

/// A file ready to be written to the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedFile {
    pub name: String,
    content: Bytes,
}

impl ServedFile {
    pub fn into_content(self) -> Bytes {
        self.content
    }
}

// One concrete place we might serve from
#[derive(Debug, Clone, PartialEq, Eq)]
struct Candidate {
    owner: String,
    repo: String,
    file_path: String,
    git_ref: String,
}

pub struct ContentResolver<S> {
    source: S,
    names: ReservedNames,
}

impl<S: ContentSource> ContentResolver<S> {
    pub fn new(source: S, names: ReservedNames) -> Self {
        Self { source, names }
    }

    // Resolves a request target to file contents
    //
    // Parameters:
    //   target: output of request::resolve_target
    //   compatibility_mode: true when no pages domain is configured, which
    //     enables the retry against the pages repository
    pub async fn open(&self, target: RequestTarget, compatibility_mode: bool) -> Result<ServedFile> {
        let attempt = self.normalize(target);

        let level = fetch_allowance(&self.source, &attempt.owner, &attempt.repo, &self.names).await;
        let (candidate, level) = if level == Allowance::None {
            self.fallback(attempt, compatibility_mode).await?
        } else {
            (attempt, level)
        };

        let config = self.config_for(&candidate, level).await?;
        let git_ref = self.select_ref(&candidate, level, config.as_ref())?;

        let raw = self
            .source
            .fetch_raw(&candidate.owner, &candidate.repo, &candidate.file_path, &git_ref)
            .await?;

        let content = if is_markdown(&candidate.file_path) {
            Bytes::from(render_markdown(&raw)?)
        } else {
            raw
        };

        Ok(ServedFile {
            name: candidate.file_path,
            content,
        })
    }

    fn normalize(&self, target: RequestTarget) -> Candidate {
        let repo = if target.repository.is_empty() {
            self.names.pages.clone()
        } else {
            target.repository
        };

        let file_path = if target.file_path.is_empty() || target.file_path == "/" {
            INDEX_FILE.to_string()
        } else {
            target.file_path
        };

        Candidate {
            owner: target.owner,
            repo,
            file_path,
            git_ref: target.git_ref,
        }
    }

    // Attempt B: the requested repository is not published
    async fn fallback(&self, attempt: Candidate, compatibility_mode: bool) -> Result<(Candidate, Allowance)> {
        if attempt.repo == self.names.pages {
            tracing::debug!(owner = %attempt.owner, repo = %attempt.repo, "pages repository is not published");
            return Err(PagesError::NotFound);
        }

        if !compatibility_mode {
            tracing::debug!(owner = %attempt.owner, repo = %attempt.repo, "repository is not published");
            return Err(PagesError::NotFound);
        }

        let git_ref = if attempt.git_ref.is_empty() {
            self.names.pages.clone()
        } else {
            attempt.git_ref
        };

        let candidate = Candidate {
            file_path: format!("{}/{}", attempt.repo, attempt.file_path),
            repo: self.names.pages.clone(),
            owner: attempt.owner,
            git_ref,
        };

        let level = fetch_allowance(&self.source, &candidate.owner, &candidate.repo, &self.names).await;
        if level == Allowance::None {
            tracing::debug!(owner = %candidate.owner, "fallback pages repository is not published");
            return Err(PagesError::NotFound);
        }

        if !self
            .source
            .has_branch(&candidate.owner, &candidate.repo, &self.names.pages)
            .await
        {
            tracing::debug!(owner = %candidate.owner, branch = %self.names.pages, "fallback pages branch missing");
            return Err(PagesError::NotFound);
        }

        Ok((candidate, level))
    }

    // Loads the repository config
    //
    // A missing or broken config is only acceptable for the pages
    // repository itself or for repositories allowed to serve every ref.
    async fn config_for(&self, candidate: &Candidate, level: Allowance) -> Result<Option<RepoConfig>> {
        let failure = match load_config(&self.source, &candidate.owner, &candidate.repo, &self.names).await {
            Ok(Some(config)) => return Ok(Some(config)),
            Ok(None) => PagesError::NotFound,
            Err(e) => e,
        };

        if candidate.repo != self.names.pages && level < Allowance::All {
            tracing::debug!(
                owner = %candidate.owner,
                repo = %candidate.repo,
                error = %failure,
                "no usable config"
            );
            return Err(failure);
        }

        if !matches!(failure, PagesError::NotFound) {
            tracing::warn!(owner = %candidate.owner, repo = %candidate.repo, error = %failure, "ignoring unusable config");
        }

        Ok(None)
    }

    fn select_ref(&self, candidate: &Candidate, level: Allowance, config: Option<&RepoConfig>) -> Result<String> {
        if config.is_none() && (candidate.repo == self.names.pages || candidate.git_ref == self.names.pages) {
            return Ok(self.names.pages.clone());
        }

        if !is_ref_allowed(&candidate.git_ref, level, config) {
            tracing::debug!(
                owner = %candidate.owner,
                repo = %candidate.repo,
                git_ref = %candidate.git_ref,
                "ref not allowed"
            );
            return Err(PagesError::NotFound);
        }

        Ok(candidate.git_ref.clone())
    }
}
