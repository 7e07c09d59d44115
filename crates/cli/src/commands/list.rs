use blobstore_client::{BlobClient, ListMode, ListOptions};
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of blobs to return.
    #[arg(long)]
    pub limit: Option<u32>,
    /// Only list pathnames starting with this prefix.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Cursor from a previous listing.
    #[arg(long)]
    pub cursor: Option<String>,
    /// Group nested pathnames into folders.
    #[arg(long)]
    pub folded: bool,
}

pub async fn run(
    client: &BlobClient,
    args: &ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let options = ListOptions {
        cursor: args.cursor.clone(),
        limit: args.limit,
        mode: args.folded.then_some(ListMode::Folded),
        prefix: args.prefix.clone(),
    };

    let page = client.list(Some(&options)).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        OutputFormat::Text => {
            for folder in page.folders().unwrap_or_default() {
                println!("  {folder}");
            }
            for blob in page.blobs() {
                println!(
                    "  {pathname} | {size} bytes | {uploaded}",
                    pathname = blob.pathname,
                    size = blob.size,
                    uploaded = blob.uploaded_at.to_rfc3339(),
                );
            }
            println!("{} blob(s).", page.blobs().len());
            if let Some(cursor) = page.cursor().filter(|_| page.has_more()) {
                println!("More results: --cursor {cursor}");
            }
        }
    }

    Ok(())
}
