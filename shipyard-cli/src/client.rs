//! HTTP client for the Shipyard server.

use crate::CliResult;
use reqwest::{Client, Response};
use serde::Deserialize;
use shipyard_core::{Ship, ShipDraft};
use std::future::Future;
use std::pin::Pin;

/// Default base URL of the Shipyard server.
pub(crate) const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Query string pairs sent with list and count requests.
pub(crate) type QueryPairs = Vec<(&'static str, String)>;

/// Ship operations exposed by the server's `/rest/ships` API.
pub(crate) trait ShipsClient {
    fn list_ships<'a>(
        &'a self,
        query: &'a QueryPairs,
    ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>>;

    fn count_ships<'a>(
        &'a self,
        query: &'a QueryPairs,
    ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>>;

    fn get_ship<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn create_ship<'a>(
        &'a self,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn update_ship<'a>(
        &'a self,
        id: &'a str,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>>;

    fn delete_ship<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>>;
}

/// Reqwest-backed ships client.
#[cfg_attr(test, allow(dead_code))]
pub(crate) struct ReqwestShipsClient {
    client: Client,
    base_url: String,
}

impl ReqwestShipsClient {
    /// Build a client for the server at `server_url`.
    #[cfg_attr(test, allow(dead_code))]
    pub(crate) fn new(server_url: &str) -> CliResult<Self> {
        let server_url = normalize_server_url(server_url)?;
        let client = Client::builder().user_agent("shipyard-cli").build()?;
        Ok(Self {
            client,
            base_url: format!("{server_url}/rest/ships"),
        })
    }

    fn ship_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

impl ShipsClient for ReqwestShipsClient {
    fn list_ships<'a>(
        &'a self,
        query: &'a QueryPairs,
    ) -> Pin<Box<dyn Future<Output = CliResult<Vec<Ship>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.get(&self.base_url).query(query).send().await?;
            Ok(ensure_success(response).await?.json::<Vec<Ship>>().await?)
        })
    }

    fn count_ships<'a>(
        &'a self,
        query: &'a QueryPairs,
    ) -> Pin<Box<dyn Future<Output = CliResult<u64>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(format!("{}/count", self.base_url))
                .query(query)
                .send()
                .await?;
            Ok(ensure_success(response).await?.json::<u64>().await?)
        })
    }

    fn get_ship<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.get(self.ship_url(id)).send().await?;
            Ok(ensure_success(response).await?.json::<Ship>().await?)
        })
    }

    fn create_ship<'a>(
        &'a self,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.post(&self.base_url).json(draft).send().await?;
            Ok(ensure_success(response).await?.json::<Ship>().await?)
        })
    }

    fn update_ship<'a>(
        &'a self,
        id: &'a str,
        draft: &'a ShipDraft,
    ) -> Pin<Box<dyn Future<Output = CliResult<Ship>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.post(self.ship_url(id)).json(draft).send().await?;
            Ok(ensure_success(response).await?.json::<Ship>().await?)
        })
    }

    fn delete_ship<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = CliResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let response = self.client.delete(self.ship_url(id)).send().await?;
            ensure_success(response).await?;
            Ok(())
        })
    }
}

/// Error payload returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pass successful responses through; turn the rest into errors carrying the
/// server's message.
async fn ensure_success(response: Response) -> CliResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(failure_message(status.as_u16(), &body).into())
}

fn failure_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if message.is_empty() {
        format!("server responded with status {status}")
    } else {
        format!("server responded with status {status}: {message}")
    }
}

/// Normalize the server base URL.
pub(crate) fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        let url = normalize_server_url("http://localhost:8080/").expect("url");
        assert_eq!(url, "http://localhost:8080");
    }

    #[test]
    fn normalize_server_url_rejects_empty() {
        let err = normalize_server_url("   ").unwrap_err();
        assert!(err.to_string().contains("server url"));
    }

    #[test]
    fn client_targets_rest_ships() {
        let client = ReqwestShipsClient::new("http://ships.test:9000/").expect("client");
        assert_eq!(client.base_url, "http://ships.test:9000/rest/ships");
        assert_eq!(client.ship_url("7"), "http://ships.test:9000/rest/ships/7");
    }

    #[test]
    fn ship_url_keeps_id_untouched() {
        let client = ReqwestShipsClient::new("http://ships.test:9000").expect("client");
        assert_eq!(client.ship_url(" 7"), "http://ships.test:9000/rest/ships/ 7");
    }

    #[test]
    fn failure_message_prefers_server_message() {
        let message = failure_message(404, r#"{"message":"ship 9 not found"}"#);
        assert_eq!(message, "server responded with status 404: ship 9 not found");
    }

    #[test]
    fn failure_message_falls_back_to_body_or_status() {
        assert_eq!(
            failure_message(502, "bad gateway\n"),
            "server responded with status 502: bad gateway"
        );
        assert_eq!(failure_message(500, ""), "server responded with status 500");
    }
}
