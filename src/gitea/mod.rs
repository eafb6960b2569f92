// src/gitea/mod.rs
// =============================================================================
// This module handles everything we need from the Gitea server.
//
// Currently implements:
// - Listing repository topics (used for the allow/deny decision)
// - Checking whether a branch exists
// - Fetching raw file contents, with LFS pointers resolved by Gitea
//
// The orchestrator only talks to the `ContentSource` trait, so tests can
// swap the real HTTP client for an in-memory one.
// =============================================================================

mod client;
mod source;

#[cfg(test)]
pub mod fake;

pub use client::GiteaClient;
pub use source::ContentSource;
