use blobstore_client::BlobClient;
use clap::Args;
use tracing::debug;

use super::CreateArgs;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Pathname of the blob in the store.
    pub pathname: String,
    /// Upload the contents of this file.
    #[arg(long, conflicts_with = "content", required_unless_present = "content")]
    pub file: Option<String>,
    /// Upload this text.
    #[arg(long)]
    pub content: Option<String>,
    #[command(flatten)]
    pub create: CreateArgs,
}

async fn read_content(args: &PutArgs) -> anyhow::Result<Vec<u8>> {
    match (&args.file, &args.content) {
        (Some(path), _) => {
            debug!(path = %path, "reading upload from file");
            Ok(tokio::fs::read(path).await?)
        }
        (None, Some(text)) => Ok(text.clone().into_bytes()),
        (None, None) => anyhow::bail!("either --file or --content is required"),
    }
}

pub async fn run(client: &BlobClient, args: &PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let content = read_content(args).await?;

    let options = args.create.options();
    let result = client.put(&args.pathname, content, Some(&options)).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            println!("Uploaded {}", result.pathname);
            println!("  URL:          {}", result.url);
            println!("  Download URL: {}", result.download_url);
            if let Some(ref content_type) = result.content_type {
                println!("  Content type: {content_type}");
            }
        }
    }

    Ok(())
}
