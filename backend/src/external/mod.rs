//! External API integrations

pub mod soil;
pub mod weather;

pub use soil::SoilClient;
pub use weather::WeatherClient;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

/// GET a JSON document, treating any non-2xx status as a failure
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T, UpstreamError> {
    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status.as_u16()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}
