use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};

use super::config::PanelConfig;
use super::demo;
use super::error::{PanelResult, RemoteTransportError};
use super::{Record, ServerAction};

pub struct PanelClient {
    client: Client,
    config: PanelConfig,
    demo: bool,
}

impl PanelClient {
    /// Create a client. Demo mode is decided here, once, from the presence of
    /// an API key.
    pub fn new(config: PanelConfig) -> PanelResult<Self> {
        let client = Client::builder().build()?;
        let demo = config.is_demo();
        if demo {
            tracing::warn!(
                base_url = %config.base_url,
                "NEONPANEL_API_KEY not configured, NeonPanel client is serving demo data"
            );
        }

        Ok(Self {
            client,
            config,
            demo,
        })
    }

    pub fn from_env() -> PanelResult<Self> {
        Self::new(PanelConfig::from_env())
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> PanelResult<Value> {
        let mut request = request.header(CONTENT_TYPE, "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "NeonPanel request rejected");
            return Err(RemoteTransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch a user's account record
    pub async fn get_user_data(&self, user_id: &str) -> PanelResult<Record> {
        if self.demo {
            return Ok(demo::user_record(user_id));
        }

        let url = self.url(&format!("/users/{}", urlencoding::encode(user_id)));
        let value = self.send(self.client.get(&url), &url).await?;
        into_record(value)
    }

    /// Fetch aggregate server statistics
    pub async fn get_server_stats(&self) -> PanelResult<Record> {
        if self.demo {
            return Ok(demo::server_stats(&mut rand::thread_rng()));
        }

        let url = self.url("/servers/stats");
        let value = self.send(self.client.get(&url), &url).await?;
        into_record(value)
    }

    /// Ask the panel to perform `action` on a server
    pub async fn execute_server_action(
        &self,
        server_id: &str,
        action: ServerAction,
    ) -> PanelResult<Record> {
        if self.demo {
            return Ok(demo::server_action(server_id, action));
        }

        let url = self.url(&format!("/servers/{}/actions", urlencoding::encode(server_id)));
        let request = self.client.post(&url).json(&json!({ "action": action }));
        let value = self.send(request, &url).await?;
        into_record(value)
    }

    /// Search panel resources. The API may answer with a bare array or with
    /// an object holding a `results` array.
    pub async fn search_resources(&self, query: &str) -> PanelResult<Vec<Record>> {
        if self.demo {
            return Ok(demo::search(query));
        }

        let url = self.url("/search");
        let request = self.client.get(&url).query(&[("q", query)]);
        let value = self.send(request, &url).await?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => items,
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(RemoteTransportError::UnexpectedBody(format!(
                        "`results` is not an array: {}",
                        other
                    )))
                }
            },
            other => {
                return Err(RemoteTransportError::UnexpectedBody(format!(
                    "expected search results, got {}",
                    other
                )))
            }
        };

        items.into_iter().map(into_record).collect()
    }
}

fn into_record(value: Value) -> PanelResult<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RemoteTransportError::UnexpectedBody(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn live_client(server: &MockServer) -> PanelClient {
        PanelClient::new(PanelConfig::new(server.uri(), Some("np-test".to_string()))).unwrap()
    }

    #[tokio::test]
    async fn test_get_server_stats_sends_bearer_token() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/stats"))
            .and(header("authorization", "Bearer np-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_servers": 12,
                "active_servers": 10
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let stats = live_client(&mock_server).get_server_stats().await?;
        assert_eq!(stats["total_servers"], json!(12));
        assert_eq!(stats["active_servers"], json!(10));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_data_escapes_id() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/team%2Fops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "team/ops"})))
            .mount(&mock_server)
            .await;

        let user = live_client(&mock_server).get_user_data("team/ops").await?;
        assert_eq!(user["id"], json!("team/ops"));
        Ok(())
    }

    #[tokio::test]
    async fn test_execute_server_action_posts_action() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/servers/srv-1/actions"))
            .and(body_json(json!({"action": "restart"})))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({"status": "queued"})))
            .mount(&mock_server)
            .await;

        let result = live_client(&mock_server)
            .execute_server_action("srv-1", ServerAction::Restart)
            .await?;
        assert_eq!(result["status"], json!("queued"));
        Ok(())
    }

    #[tokio::test]
    async fn test_search_accepts_results_object_and_array() -> anyhow::Result<()> {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "db primary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "db-primary"}]
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "cache"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"name": "cache-redis"}])),
            )
            .mount(&mock_server)
            .await;

        let client = live_client(&mock_server);
        let results = client.search_resources("db primary").await?;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], json!("db-primary"));

        let results = client.search_resources("cache").await?;
        assert_eq!(results[0]["name"], json!("cache-redis"));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_is_not_an_empty_result() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/stats"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let err = live_client(&mock_server).get_server_stats().await.unwrap_err();
        match err {
            RemoteTransportError::Status { status, url } => {
                assert_eq!(status, 401);
                assert!(url.ends_with("/servers/stats"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/u1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["not", "a", "user"])))
            .mount(&mock_server)
            .await;

        let err = live_client(&mock_server).get_user_data("u1").await.unwrap_err();
        assert!(matches!(err, RemoteTransportError::UnexpectedBody(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_request_error() {
        let client =
            PanelClient::new(PanelConfig::new("http://127.0.0.1:9", Some("k".into()))).unwrap();
        let err = client.search_resources("x").await.unwrap_err();
        assert!(matches!(err, RemoteTransportError::Request(_)));
    }

    #[tokio::test]
    async fn test_demo_mode_never_calls_network() -> anyhow::Result<()> {
        let client = PanelClient::new(PanelConfig::new("http://127.0.0.1:9", None))?;
        assert!(client.is_demo());

        let stats = client.get_server_stats().await?;
        let total = stats["total_servers"].as_u64().unwrap();
        let active = stats["active_servers"].as_u64().unwrap();
        assert!(active <= total);

        let results = client.search_resources("DB").await?;
        assert!(!results.is_empty());
        for result in &results {
            let name = result["name"].as_str().unwrap().to_lowercase();
            assert!(name.contains("db"));
        }
        assert!(client.search_resources("no-such-thing").await?.is_empty());

        let user = client.get_user_data("alice").await?;
        assert_eq!(user, client.get_user_data("alice").await?);
        Ok(())
    }
}
