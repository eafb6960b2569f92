// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - serve: run the pages HTTP server in front of a Gitea instance
// - resolve: show how a host + path would be mapped, without any network
//
// Every `serve` option can also be given through an environment variable,
// which is the usual way to pass the token in a container.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::policy::{DEFAULT_ALLOWALL_TOPIC, DEFAULT_PAGES_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "gitea-pages",
    version,
    about = "Serve static sites and Markdown straight from Gitea repositories",
    long_about = "gitea-pages answers HTTP requests with files fetched from Gitea. \
                  Repositories opt in with a topic, and a gitea-pages.toml on the \
                  gitea-pages branch decides which refs are published."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pages server
    ///
    /// Example: gitea-pages serve --server https://gitea.example.com --domain pages.example.com
    Serve(ServeArgs),

    /// Print the owner/repo/file/ref a request would resolve to
    ///
    /// Example: gitea-pages resolve docs.someorg.pages.example.com /index.html --domain pages.example.com
    Resolve {
        /// Host header of the request (e.g. someorg.pages.example.com)
        host: String,

        /// URL path of the request (e.g. /index.html)
        #[arg(default_value = "/")]
        path: String,

        /// Value of the ?ref= query parameter
        #[arg(long = "ref")]
        git_ref: Option<String>,

        /// Pages domain; leave out for compatibility mode
        #[arg(long, default_value = "")]
        domain: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Base URL of the Gitea server
    #[arg(long, env = "GITEA_SERVER")]
    pub server: String,

    /// Access token sent with every API call
    #[arg(long, env = "GITEA_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Domain pages are served under (<ref>.<repo>.<owner>.<domain>).
    /// Empty means compatibility mode: <owner>.<anything>/<repo>/<path>
    #[arg(long, env = "GITEA_PAGES_DOMAIN", default_value = "")]
    pub domain: String,

    /// Default repository, opt-in topic, pages branch and config file name
    #[arg(long, env = "GITEA_PAGES_REPO", default_value = DEFAULT_PAGES_NAME)]
    pub pages_repo: String,

    /// Topic that allows every ref of a repository to be served
    #[arg(long, env = "GITEA_PAGES_ALLOWALL", default_value = DEFAULT_ALLOWALL_TOPIC)]
    pub allowall_topic: String,

    /// Address to listen on
    #[arg(long, env = "GITEA_PAGES_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: String,

    /// Timeout in seconds for requests to Gitea
    #[arg(long, env = "GITEA_PAGES_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}
