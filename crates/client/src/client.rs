use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::{Body, Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::options::{CommonCreateOptions, ListOptions};
use crate::types::{CopyResult, HeadBody, HeadResult, ListBody, ListResponse, PutResult};

/// Header carrying the API version on every request.
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Characters escaped in pathnames. `/` is kept so nested pathnames stay nested.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Serialize)]
struct DeleteRequest<'a> {
    urls: Vec<&'a str>,
}

/// HTTP client for the blob API.
///
/// Holds an immutable [`ClientConfig`] and a transport handle. Cloning is
/// cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct BlobClient {
    client: Client,
    config: ClientConfig,
}

/// Builder for configuring a [`BlobClient`].
#[derive(Debug)]
pub struct BlobClientBuilder {
    config: ClientConfig,
    client: Option<Client>,
}

impl Default for BlobClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobClientBuilder {
    /// Create a builder starting from the environment-resolved configuration.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::from_env(None),
            client: None,
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the read/write token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config = self.config.with_token(token);
        self
    }

    /// Set the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    /// Set the API version.
    #[must_use]
    pub fn api_version(mut self, api_version: u32) -> Self {
        self.config = self.config.with_api_version(api_version);
        self
    }

    /// Set the request timeout.
    ///
    /// Ignored when a custom client is supplied with [`Self::client`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Use a custom reqwest Client.
    ///
    /// Useful for configuring TLS, proxies, or other advanced settings.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BlobClient, Error> {
        let client = match self.client {
            Some(c) => c,
            None => Client::builder()
                .timeout(self.config.timeout)
                .build()
                .map_err(|e| Error::Configuration(e.to_string()))?,
        };

        Ok(BlobClient {
            client,
            config: self.config,
        })
    }
}

impl BlobClient {
    /// Create a client, taking the token from the argument or from
    /// `BLOB_READ_WRITE_TOKEN`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use blobstore_client::BlobClient;
    ///
    /// let client = BlobClient::new(Some("vercel_blob_rw_...".to_string())).unwrap();
    /// ```
    pub fn new(token: Option<String>) -> Result<Self, Error> {
        BlobClientBuilder {
            config: ClientConfig::from_env(token),
            client: None,
        }
        .build()
    }

    /// Create a builder for advanced configuration.
    pub fn builder() -> BlobClientBuilder {
        BlobClientBuilder::new()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The underlying HTTP client, for building requests passed to
    /// [`Self::request`].
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Absolute URL for a pathname in the store.
    pub fn endpoint(&self, pathname: &str) -> String {
        let pathname = pathname.trim_start_matches('/');
        format!(
            "{}/{}",
            self.config.base_url,
            utf8_percent_encode(pathname, PATH)
        )
    }

    /// Send a request to the API.
    ///
    /// Attaches the `x-api-version` and `authorization` headers. Transport
    /// failures become [`Error::Connection`]; non-2xx responses are mapped
    /// from their error code (see [`Error::from_api_error`]).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), blobstore_client::Error> {
    /// use blobstore_client::BlobClient;
    ///
    /// let client = BlobClient::new(None)?;
    /// let request = client.http_client().get(client.endpoint("/"));
    /// let response = client.request(request).await?;
    /// println!("{}", response.status());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request
            .header(API_VERSION_HEADER, self.config.api_version)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Error::from_response(response).await)
        }
    }

    async fn request_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        self.request(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    fn with_create_options(
        request: RequestBuilder,
        options: Option<&CommonCreateOptions>,
    ) -> RequestBuilder {
        options
            .map(CommonCreateOptions::headers)
            .unwrap_or_default()
            .into_iter()
            .fold(request, |request, (name, value)| request.header(name, value))
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Upload `content` to `pathname`, creating or overwriting the blob.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), blobstore_client::Error> {
    /// use blobstore_client::{BlobClient, CommonCreateOptions};
    ///
    /// let client = BlobClient::new(None)?;
    /// let options = CommonCreateOptions::new().add_random_suffix(true);
    /// let result = client.put("hello-world.txt", "hello world", Some(&options)).await?;
    /// println!("uploaded to {}", result.url);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self, content, options))]
    pub async fn put(
        &self,
        pathname: &str,
        content: impl Into<Body>,
        options: Option<&CommonCreateOptions>,
    ) -> Result<PutResult, Error> {
        debug!("uploading blob");
        let request = self.client.put(self.endpoint(pathname)).body(content);
        let request = Self::with_create_options(request, options);
        self.request_json(request).await
    }

    /// Delete the blobs at the given URLs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), blobstore_client::Error> {
    /// use blobstore_client::BlobClient;
    ///
    /// let client = BlobClient::new(None)?;
    /// client.del(&["https://store.public.blob.vercel-storage.com/a.txt"]).await?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(count = urls.len()))]
    pub async fn del<S: AsRef<str>>(&self, urls: &[S]) -> Result<(), Error> {
        debug!("deleting blobs");
        let body = DeleteRequest {
            urls: urls.iter().map(AsRef::as_ref).collect(),
        };
        let request = self.client.post(self.endpoint("delete")).json(&body);
        self.request(request).await?;
        Ok(())
    }

    /// Copy the blob at `from_url` to `to_pathname`.
    #[instrument(skip(self, options))]
    pub async fn copy(
        &self,
        from_url: &str,
        to_pathname: &str,
        options: Option<&CommonCreateOptions>,
    ) -> Result<CopyResult, Error> {
        debug!("copying blob");
        let request = self
            .client
            .put(self.endpoint(to_pathname))
            .query(&[("fromUrl", from_url)]);
        let request = Self::with_create_options(request, options);
        self.request_json(request).await
    }

    /// Fetch the metadata of the blob at `url`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), blobstore_client::Error> {
    /// use blobstore_client::BlobClient;
    ///
    /// let client = BlobClient::new(None)?;
    /// match client.head("https://store.public.blob.vercel-storage.com/a.txt").await {
    ///     Ok(head) => println!("{} bytes, uploaded {}", head.size, head.uploaded_at),
    ///     Err(e) if e.is_not_found() => println!("no such blob"),
    ///     Err(e) => return Err(e),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn head(&self, url: &str) -> Result<HeadResult, Error> {
        debug!("fetching blob metadata");
        let request = self.client.get(self.endpoint("")).query(&[("url", url)]);
        let body: HeadBody = self.request_json(request).await?;
        HeadResult::try_from(body)
    }

    /// List blobs in the store.
    ///
    /// Returns [`ListResponse::Folded`] when folded mode is requested and
    /// [`ListResponse::Expanded`] otherwise. Only one page is fetched; pass
    /// the returned cursor back to continue.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), blobstore_client::Error> {
    /// use blobstore_client::{BlobClient, ListMode, ListOptions};
    ///
    /// let client = BlobClient::new(None)?;
    /// let options = ListOptions::new().prefix("images/").mode(ListMode::Folded);
    /// let page = client.list(Some(&options)).await?;
    /// for blob in page.blobs() {
    ///     println!("{} ({} bytes)", blob.pathname, blob.size);
    /// }
    /// for folder in page.folders().unwrap_or_default() {
    ///     println!("{folder}/");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub async fn list(&self, options: Option<&ListOptions>) -> Result<ListResponse, Error> {
        debug!("listing blobs");
        let mut request = self.client.get(self.endpoint(""));
        if let Some(options) = options {
            request = request.query(options);
        }
        let body: ListBody = self.request_json(request).await?;
        body.into_response(options.and_then(|o| o.mode))
    }
}
