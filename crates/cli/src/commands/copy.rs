use blobstore_client::BlobClient;
use clap::Args;

use super::CreateArgs;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// URL of the blob to copy.
    pub from_url: String,
    /// Pathname of the copy.
    pub to_pathname: String,
    #[command(flatten)]
    pub create: CreateArgs,
}

pub async fn run(
    client: &BlobClient,
    args: &CopyArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let options = args.create.options();
    let result = client
        .copy(&args.from_url, &args.to_pathname, Some(&options))
        .await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        OutputFormat::Text => {
            println!("Copied to {}", result.pathname);
            println!("  URL:          {}", result.url);
            println!("  Download URL: {}", result.download_url);
        }
    }

    Ok(())
}
