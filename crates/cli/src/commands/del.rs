use blobstore_client::BlobClient;
use clap::Args;

#[derive(Args, Debug)]
pub struct DelArgs {
    /// URLs of the blobs to delete.
    #[arg(required = true)]
    pub urls: Vec<String>,
}

pub async fn run(client: &BlobClient, args: &DelArgs) -> anyhow::Result<()> {
    client.del(args.urls.as_slice()).await?;
    println!("Deleted {} blob(s).", args.urls.len());
    Ok(())
}
