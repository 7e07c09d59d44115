//! Blob store CLI
//!
//! A command-line interface for uploading, inspecting, copying, listing and
//! deleting blobs.

mod commands;

use blobstore_client::{BlobClient, ClientConfig, Error};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

/// Blob store CLI: manage blobs in a Vercel Blob store.
#[derive(Parser, Debug)]
#[command(name = "blobstore", version, about)]
struct Cli {
    /// Read/write token for the store.
    #[arg(long, env = "BLOB_READ_WRITE_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// API base URL.
    #[arg(long, env = "VERCEL_BLOB_API_URL", global = true)]
    base_url: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a blob.
    Put(commands::put::PutArgs),
    /// Show a blob's metadata.
    Head(commands::head::HeadArgs),
    /// Delete blobs by URL.
    Del(commands::del::DelArgs),
    /// Copy a blob to a new pathname.
    Copy(commands::copy::CopyArgs),
    /// List blobs in the store.
    List(commands::list::ListArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ClientConfig::from_env(cli.token.clone());
    let config = match cli.base_url {
        Some(ref url) => config.with_base_url(url),
        None => config,
    };
    let client = BlobClient::builder().config(config).build()?;

    let result = match cli.command {
        Command::Put(args) => commands::put::run(&client, &args, &cli.format).await,
        Command::Head(args) => commands::head::run(&client, &args, &cli.format).await,
        Command::Del(args) => commands::del::run(&client, &args).await,
        Command::Copy(args) => commands::copy::run(&client, &args, &cli.format).await,
        Command::List(args) => commands::list::run(&client, &args, &cli.format).await,
    };

    if let Some(Error::RateLimited {
        retry_after: Some(seconds),
    }) = result.as_ref().err().and_then(|e| e.downcast_ref::<Error>())
    {
        eprintln!("Rate limited; retry in {seconds} seconds.");
    }

    result
}
