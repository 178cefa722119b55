//! Source adapters for the two upstream mod catalogs.
//!
//! Each adapter translates one catalog's native schema into the
//! canonical model through a single exhaustive mapping per response
//! shape. The adapters are independent and stateless; they share only
//! the canonical model and the typed HTTP plumbing below. Neither
//! retries internally — retry policy belongs to the caller.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, WeaveError};

pub mod curseforge;
pub mod modrinth;

pub use curseforge::CurseForgeClient;
pub use modrinth::ModrinthClient;

const USER_AGENT: &str = concat!("modweaver/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the shared HTTP client configuration both adapters use.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| WeaveError::Configuration {
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Join an adapter base URL with an endpoint path.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{base}{path}");
    Url::parse(&raw).map_err(|source| WeaveError::InvalidUrl { url: raw, source })
}

/// Issue a GET and parse the JSON body, mapping any non-success status
/// to [`WeaveError::Upstream`] with the numeric status code.
pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T> {
    debug!(url = %url, "catalog GET");
    let response = client.get(url).send().await?;
    read_json(response).await
}

/// Issue a POST with a JSON body and parse the JSON response.
pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
    client: &Client,
    url: Url,
    body: &B,
) -> Result<T> {
    debug!(url = %url, "catalog POST");
    let response = client.post(url).json(body).send().await?;
    read_json(response).await
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let url = response.url().to_string();

    if !status.is_success() {
        return Err(WeaveError::Upstream { status: status.as_u16(), url });
    }

    let text = response.text().await?;
    debug!(url = %url, bytes = text.len(), "catalog response");

    serde_json::from_str(&text).map_err(|source| WeaveError::ResponseParse { url, source })
}
