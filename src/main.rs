// src/main.rs
// =============================================================================
// This is the entry point of the pages server.
//
// What happens here:
// 1. Parse command-line arguments (and environment) using clap
// 2. Set up logging (RUST_LOG, defaults to "info")
// 3. Dispatch to the subcommand: run the server, or resolve one request
// 4. Exit with code 2 if startup fails
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod content;   // src/content.rs - decides what to serve and fetches it
mod error;     // src/error.rs - error types and their HTTP statuses
mod gitea;     // src/gitea/ - Gitea API client
mod policy;    // src/policy/ - topics, allowed refs, repo config
mod render;    // src/render/ - Markdown to HTML
mod request;   // src/request.rs - host/path -> owner/repo/file/ref
mod server;    // src/server.rs - axum front end

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands, ServeArgs};
use content::ContentResolver;
use gitea::GiteaClient;
use policy::ReservedNames;
use server::AppState;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Resolve {
            host,
            path,
            git_ref,
            domain,
        } => {
            let target = request::resolve_target(&host, &path, git_ref.as_deref(), &domain);
            println!("{}", serde_json::to_string_pretty(&target)?);
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let listen: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", args.listen))?;

    let client = GiteaClient::new(&args.server, &args.token, Duration::from_secs(args.timeout_secs))
        .context("cannot create Gitea client")?;
    let names = ReservedNames::new(&args.pages_repo, &args.allowall_topic);

    let mode = if args.domain.is_empty() { "compatibility" } else { "subdomain" };
    tracing::info!(
        %listen,
        server = %args.server,
        domain = %args.domain,
        pages = %names.pages,
        mode,
        "gitea-pages starting"
    );

    let app = server::build_router(AppState {
        resolver: ContentResolver::new(client, names),
        domain: args.domain,
    });

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("cannot bind {}", listen))?;
    axum::serve(listener, app).await.context("server failed")?;

    Ok(())
}
