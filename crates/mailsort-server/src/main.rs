//! Mailsort — email categorization server and command-line adapters.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
mod fetch;
mod protocol;
mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("MAILSORT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

fn print_help() {
    println!("Mailsort — email categorization engine");
    println!();
    println!("Usage: mailsort [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve                          Start the HTTP server");
    println!("  classify [rules|similarity] [options]   Classify messages read from stdin");
    println!("      --taxonomy FILE                     Custom categories (JSON array)");
    println!("      --table                             Print a table instead of JSON");
    println!("  fetch-model [dir]                       Download the embedding model");
    println!("  help                                    Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries classification output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(String::as_str), Some("--help" | "-h" | "help")) {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    let config = mailsort_core::MailsortConfig::from_env(&data_dir)?;

    match args.get(1).map(String::as_str) {
        None | Some("serve") => serve(config).await,
        Some("classify") => {
            let classify_args = cli::ClassifyArgs::parse(&args[2..])?;
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let output = tokio::task::spawn_blocking(move || {
                cli::run_classify(&classify_args, config, &input)
            })
            .await??;
            print!("{}", output);
            Ok(())
        }
        Some("fetch-model") => {
            let dir = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| config.model_dir.clone());
            let written = fetch::fetch_model(&dir).await?;
            info!("Model ready in {} ({} files downloaded)", dir.display(), written.len());
            Ok(())
        }
        Some(other) => {
            eprintln!("Unknown command: {}. Use 'mailsort help' for usage.", other);
            std::process::exit(1);
        }
    }
}

async fn serve(config: mailsort_core::MailsortConfig) -> anyhow::Result<()> {
    info!("Data directory: {}", config.data_dir.display());
    let port = config.port;
    let warm = config.warm_model;

    let state = Arc::new(AppState::new(config)?);

    if warm {
        let warm_state = state.clone();
        tokio::task::spawn_blocking(move || {
            match warm_state.classifier.warm(&warm_state.taxonomy) {
                Ok(()) => info!("Embedding model and category descriptors ready"),
                Err(e) => warn!("Model warm-up failed, similarity requests will fail: {}", e),
            }
        });
    }

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mailsort server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
