// src/request.rs
// =============================================================================
// This module turns an incoming request (Host header + URL path + ?ref=)
// into the repository coordinates we need to fetch a file.
//
// Two addressing styles are supported:
//
// 1. Compatibility mode (no domain configured):
//      http://<owner>.anything/<repo>/<file path>?ref=<ref>
//    The first path segment names the repository. A single segment means
//    "the default pages repository" and the segment is the file.
//
// 2. Subdomain mode (domain configured), like GitHub Pages:
//      Host                              Inferred
//      <owner>.<domain>                  repo=<default>, ref=<default>
//      <repo>.<owner>.<domain>           ref=<default>
//      <ref>.<repo>.<owner>.<domain>
//    The file path is always the URL path as-is.
//    With more than three labels the extra leading labels are ignored.
//
// This is plain string parsing: no network calls happen here.
// =============================================================================

use serde::Serialize;

/// Where a request points, before any defaults are applied.
///
/// Empty `repository` means the default pages repository and empty
/// `git_ref` means the default ref; the content resolver fills those in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestTarget {
    pub owner: String,
    pub repository: String,
    pub file_path: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
}

// Resolves owner, repository, file path and ref for a request
//
// Parameters:
//   host: the Host header value (a ":port" suffix is ignored)
//   path: the decoded URL path, e.g. "/docs/index.html"
//   query_ref: the value of the `ref` query parameter, if any
//   domain: the configured pages domain ("" = compatibility mode)
pub fn resolve_target(host: &str, path: &str, query_ref: Option<&str>, domain: &str) -> RequestTarget {
    let host = strip_port(host).to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();

    // Remove the domain (a no-op when it is empty), then any dot left behind
    let host = host.strip_suffix(domain.as_str()).unwrap_or(host.as_str());
    let labels: Vec<&str> = host.trim_end_matches('.').split('.').collect();

    let git_ref = query_ref.unwrap_or_default().to_string();

    if domain.is_empty() {
        // The owner is the first label of the full host
        let owner = labels[0].to_string();
        let (repository, file_path) = split_repo_from_path(path);

        return RequestTarget {
            owner,
            repository,
            file_path,
            git_ref,
        };
    }

    // Only the last three labels matter: [ref.]repo.owner
    let relevant = &labels[labels.len().saturating_sub(3)..];
    let (owner, repository, git_ref) = match relevant {
        [owner] => (*owner, "", git_ref.as_str()),
        [repo, owner] => (*owner, *repo, git_ref.as_str()),
        [branch, repo, owner] => (*owner, *repo, *branch),
        _ => ("", "", git_ref.as_str()),
    };

    RequestTarget {
        owner: owner.to_string(),
        repository: repository.to_string(),
        file_path: path.to_string(),
        git_ref: git_ref.to_string(),
    }
}

// Splits "/repo/a/b.html" into ("repo", "a/b.html")
// and "/b.html" into ("", "b.html")
fn split_repo_from_path(path: &str) -> (String, String) {
    let path = path.strip_prefix('/').unwrap_or(path);

    match path.split_once('/') {
        Some((repo, rest)) => (repo.to_string(), rest.to_string()),
        None => (String::new(), path.to_string()),
    }
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a slice pattern?
//    - `match relevant { [owner] => .., [repo, owner] => .. }` matches on the
//      length of the slice and binds its elements in one go
//    - The `_` arm covers the empty slice, which the compiler insists on
//
// 2. Why strip_suffix + unwrap_or?
//    - strip_suffix returns None when the suffix is not there
//    - unwrap_or(host.as_str()) keeps the original string in that case
//
// 3. Why does resolve_target return owned Strings?
//    - The target outlives the request headers it was parsed from
//    - It is handed to async code that may run after the request is gone
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn target(owner: &str, repository: &str, file_path: &str, git_ref: &str) -> RequestTarget {
        RequestTarget {
            owner: owner.to_string(),
            repository: repository.to_string(),
            file_path: file_path.to_string(),
            git_ref: git_ref.to_string(),
        }
    }

    #[test]
    fn test_owner_only_subdomain() {
        let got = resolve_target("a.example.com", "/x/y", None, "example.com");
        assert_eq!(got, target("a", "", "/x/y", ""));
    }

    #[test]
    fn test_repo_subdomain() {
        let got = resolve_target("b.a.example.com", "/x", None, "example.com");
        assert_eq!(got, target("a", "b", "/x", ""));
    }

    #[test]
    fn test_branch_subdomain() {
        let got = resolve_target("c.b.a.example.com", "/x", None, "example.com");
        assert_eq!(got, target("a", "b", "/x", "c"));
    }

    #[test]
    fn test_branch_subdomain_overrides_query_ref() {
        let got = resolve_target("c.b.a.example.com", "/x", Some("main"), "example.com");
        assert_eq!(got.git_ref, "c");
    }

    #[test]
    fn test_query_ref_used_without_branch_label() {
        let got = resolve_target("b.a.example.com", "/x", Some("dev"), "example.com");
        assert_eq!(got, target("a", "b", "/x", "dev"));
    }

    #[test]
    fn test_extra_labels_are_ignored() {
        let got = resolve_target("z.c.b.a.example.com", "/x", None, "example.com");
        assert_eq!(got, target("a", "b", "/x", "c"));
    }

    #[test]
    fn test_port_and_case_are_ignored() {
        let got = resolve_target("Docs.Someorg.Example.com:8080", "/", None, "example.com");
        assert_eq!(got, target("someorg", "docs", "/", ""));
    }

    #[test]
    fn test_compat_single_segment_is_file() {
        let got = resolve_target("someorg.git.example.org", "/index.html", None, "");
        assert_eq!(got, target("someorg", "", "index.html", ""));
    }

    #[test]
    fn test_compat_first_segment_is_repo() {
        let got = resolve_target("someorg.git.example.org", "/blog/posts/a.md", Some("main"), "");
        assert_eq!(got, target("someorg", "blog", "posts/a.md", "main"));
    }

    #[test]
    fn test_compat_root_path() {
        let got = resolve_target("someorg", "/", None, "");
        assert_eq!(got, target("someorg", "", "", ""));
    }
}
