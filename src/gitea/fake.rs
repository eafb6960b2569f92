// src/gitea/fake.rs
// In-memory stand-in for a Gitea server, used by tests.
//
// Paths are stored without a leading '/', matching how GiteaClient builds
// its URLs. A repository without registered topics fails the topics call
// the way a missing repository would.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use bytes::Bytes;

use super::ContentSource;
use crate::error::SourceError;

#[derive(Default)]
pub struct FakeSource {
    topics: HashMap<(String, String), Vec<String>>,
    branches: HashSet<(String, String, String)>,
    files: HashMap<(String, String, String, String), Bytes>,
    broken_files: HashMap<(String, String, String, String), u16>,
}

impl FakeSource {
    pub fn topics(mut self, owner: &str, repo: &str, topics: &[&str]) -> Self {
        self.topics.insert(
            (owner.to_string(), repo.to_string()),
            topics.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn branch(mut self, owner: &str, repo: &str, branch: &str) -> Self {
        self.branches
            .insert((owner.to_string(), repo.to_string(), branch.to_string()));
        self
    }

    pub fn file(mut self, owner: &str, repo: &str, git_ref: &str, path: &str, content: &str) -> Self {
        self.files.insert(key(owner, repo, git_ref, path), Bytes::from(content.to_string()));
        self
    }

    pub fn broken_file(mut self, owner: &str, repo: &str, git_ref: &str, path: &str, status: u16) -> Self {
        self.broken_files.insert(key(owner, repo, git_ref, path), status);
        self
    }
}

fn key(owner: &str, repo: &str, git_ref: &str, path: &str) -> (String, String, String, String) {
    (
        owner.to_string(),
        repo.to_string(),
        git_ref.to_string(),
        path.trim_start_matches('/').to_string(),
    )
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn list_topics(&self, owner: &str, repo: &str) -> std::result::Result<Vec<String>, SourceError> {
        self.topics
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .ok_or(SourceError::NotFound)
    }

    async fn has_branch(&self, owner: &str, repo: &str, branch: &str) -> bool {
        self.branches
            .contains(&(owner.to_string(), repo.to_string(), branch.to_string()))
    }

    async fn fetch_raw(
        &self,
        owner: &str,
        repo: &str,
        file_path: &str,
        git_ref: &str,
    ) -> std::result::Result<Bytes, SourceError> {
        let key = key(owner, repo, git_ref, file_path);
        if let Some(status) = self.broken_files.get(&key) {
            return Err(SourceError::Status(*status));
        }
        self.files.get(&key).cloned().ok_or(SourceError::NotFound)
    }
}
