use blobstore_client::BlobClient;
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct HeadArgs {
    /// URL of the blob.
    pub url: String,
}

pub async fn run(
    client: &BlobClient,
    args: &HeadArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let head = client.head(&args.url).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&head)?);
        }
        OutputFormat::Text => {
            println!("Pathname:            {}", head.pathname);
            println!("URL:                 {}", head.url);
            println!("Download URL:        {}", head.download_url);
            println!("Size:                {} bytes", head.size);
            println!("Uploaded at:         {}", head.uploaded_at.to_rfc3339());
            println!("Content type:        {}", head.content_type);
            println!("Content disposition: {}", head.content_disposition);
            println!("Cache control:       {}", head.cache_control);
        }
    }

    Ok(())
}
