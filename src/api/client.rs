//! Azure Files HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use reqwest::{header, Client, Response};
use url::Url;

use crate::api::auth::{rfc1123, SharedKeyCredential};
use crate::api::types::EnumerationResults;
use crate::error::{Error, Result};
use crate::share::{DirectoryListing, RemoteFile, RemoteLocation, ShareBackend};

/// REST API version sent with every request.
pub const API_VERSION: &str = "2020-10-02";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Azure Files client authenticated with a shared key.
pub struct AzureFileClient {
    client: Client,
    credential: SharedKeyCredential,
    endpoint: Url,
}

impl AzureFileClient {
    /// Create a client for the credential's account.
    ///
    /// `endpoint` overrides the public service URL (emulators, sovereign clouds, tests).
    pub fn new(credential: SharedKeyCredential, endpoint: Option<Url>) -> Result<Self> {
        let endpoint = match endpoint {
            Some(url) => url,
            None => default_endpoint(credential.account_name())?,
        };

        if endpoint.cannot_be_a_base() {
            return Err(Error::ConfigValidation {
                field: "endpoint".to_string(),
                message: format!("'{}' is not a usable base URL", endpoint),
            });
        }

        let client = Client::builder()
            .user_agent(concat!("azurefileshare/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credential,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request URL for a location, percent-encoding every segment.
    pub fn url_for(&self, location: &RemoteLocation, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint.clone();
        url.set_query(None);
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Config(format!("endpoint '{}' cannot be a base", self.endpoint))
            })?;
            segments.pop_if_empty();
            segments.push(location.share());
            segments.extend(location.segments());
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    /// Make a signed GET request.
    async fn get(&self, url: Url, extra_headers: &[(&str, String)]) -> Result<Response> {
        let mut ms_headers = vec![
            ("x-ms-date".to_string(), rfc1123(Utc::now())),
            ("x-ms-version".to_string(), API_VERSION.to_string()),
        ];
        ms_headers.extend(extra_headers.iter().map(|(k, v)| (k.to_string(), v.clone())));

        let authorization = self.credential.authorization("GET", &url, &ms_headers);

        tracing::debug!("GET {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(header::AUTHORIZATION, authorization);
        for (name, value) in &ms_headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());

            return Err(Error::Api {
                status: status.as_u16(),
                code,
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Fetch one page of a directory listing.
    async fn list_page(
        &self,
        location: &RemoteLocation,
        marker: Option<&str>,
    ) -> Result<EnumerationResults> {
        let mut query = vec![("restype", "directory"), ("comp", "list")];
        if let Some(marker) = marker {
            query.push(("marker", marker));
        }

        let url = self.url_for(location, &query)?;
        let text = self.get(url, &[]).await?.text().await?;
        EnumerationResults::from_xml(&text)
    }
}

/// Public service endpoint for an account.
pub fn default_endpoint(account_name: &str) -> Result<Url> {
    Ok(Url::parse(&format!(
        "https://{}.file.core.windows.net/",
        account_name
    ))?)
}

#[async_trait]
impl ShareBackend for AzureFileClient {
    async fn list_directory(&self, location: &RemoteLocation) -> Result<DirectoryListing> {
        let mut listing = DirectoryListing::default();
        let mut marker: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.list_page(location, marker.as_deref()).await?;
            pages += 1;
            marker = page.continuation().map(str::to_string);
            listing.extend(page.into_listing());

            if marker.is_none() {
                break;
            }
        }

        tracing::debug!(
            "Listed {}: {} directories, {} files ({} page(s))",
            location,
            listing.directories.len(),
            listing.files.len(),
            pages
        );

        Ok(listing)
    }

    async fn open_file(&self, location: &RemoteLocation, offset: u64) -> Result<RemoteFile> {
        let url = self.url_for(location, &[])?;
        let range = if offset > 0 {
            vec![("x-ms-range", format!("bytes={}-", offset))]
        } else {
            Vec::new()
        };

        let response = self.get(url, &range).await?;
        let content_length = response.content_length().ok_or_else(|| {
            Error::Download(format!("no Content-Length returned for {}", location))
        })?;

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed();

        Ok(RemoteFile {
            content_length,
            body,
        })
    }
}
