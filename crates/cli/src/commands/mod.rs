pub mod copy;
pub mod del;
pub mod head;
pub mod list;
pub mod put;

use blobstore_client::CommonCreateOptions;
use clap::Args;

/// Flags shared by the commands that create a blob.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Append a random suffix to the pathname.
    #[arg(long)]
    pub random_suffix: bool,
    /// Content type to store.
    #[arg(long)]
    pub content_type: Option<String>,
    /// Cache max-age in seconds.
    #[arg(long)]
    pub cache_control_max_age: Option<u64>,
}

impl CreateArgs {
    pub fn options(&self) -> CommonCreateOptions {
        let mut options = CommonCreateOptions::new();
        if self.random_suffix {
            options = options.add_random_suffix(true);
        }
        if let Some(ref content_type) = self.content_type {
            options = options.content_type(content_type);
        }
        if let Some(max_age) = self.cache_control_max_age {
            options = options.cache_control_max_age(max_age);
        }
        options
    }
}
