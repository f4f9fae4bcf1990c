//! `reqwest` client for the SmartThings REST API.

use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;

use acbridge_app::ports::DeviceCloud;
use acbridge_domain::command::{Command, CommandOutcome};
use acbridge_domain::device::Device;
use acbridge_domain::error::BridgeError;
use acbridge_domain::id::DeviceId;
use acbridge_domain::status::DeviceStatus;

use crate::config::SmartThingsConfig;
use crate::error::SmartThingsError;
use crate::wire::{CommandRequest, CommandResponse, DevicePage, error_message};

/// SmartThings device cloud.
///
/// Every request carries the configured token as a bearer token. Construct
/// once and share; the inner [`reqwest::Client`] pools connections.
pub struct SmartThingsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SmartThingsClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SmartThingsError::MissingToken`] when no token is set, or
    /// [`SmartThingsError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SmartThingsConfig) -> Result<Self, SmartThingsError> {
        if config.token.trim().is_empty() {
            return Err(SmartThingsError::MissingToken);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("acbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Fetch every device, following `_links.next.href` until exhausted.
    ///
    /// Items without a usable device id are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first request or decoding error.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_devices(&self) -> Result<Vec<Device>, SmartThingsError> {
        let mut devices = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(format!("{}/devices", self.base_url));

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                tracing::warn!(%url, "pagination loops back, stopping");
                break;
            }
            let page: DevicePage = self.get_json(&url).await?;
            next = page.next_href().map(str::to_string);
            for item in page.items {
                match item.into_device() {
                    Ok(device) => devices.push(device),
                    Err(err) => tracing::warn!(%err, "skipping unusable device item"),
                }
            }
        }

        tracing::debug!(count = devices.len(), pages = visited.len(), "devices fetched");
        Ok(devices)
    }

    /// Fetch the status document of one device.
    ///
    /// # Errors
    ///
    /// Returns a request, API or decoding error.
    #[tracing::instrument(skip(self), fields(device_id = %device_id))]
    pub async fn fetch_status(
        &self,
        device_id: &DeviceId,
    ) -> Result<DeviceStatus, SmartThingsError> {
        let url = format!("{}/devices/{}/status", self.base_url, device_id);
        self.get_json(&url).await
    }

    /// Post one command and map the answer to an outcome.
    ///
    /// # Errors
    ///
    /// Returns a request, API or decoding error. A refused command is an
    /// `Ok` outcome.
    #[tracing::instrument(
        skip(self, command),
        fields(device_id = %device_id, capability = %command.capability, command = %command.command)
    )]
    pub async fn send_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> Result<CommandOutcome, SmartThingsError> {
        let url = format!("{}/devices/{}/commands", self.base_url, device_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&CommandRequest {
                commands: [command],
            })
            .send()
            .await?;
        let answer: CommandResponse = Self::decode(response).await?;
        let outcome = answer.into_outcome();
        tracing::debug!(status = %outcome.status, "command answered");
        Ok(outcome)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SmartThingsError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SmartThingsError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SmartThingsError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        serde_json::from_str(&body).map_err(SmartThingsError::Decode)
    }
}

impl DeviceCloud for SmartThingsClient {
    async fn list_devices(&self) -> Result<Vec<Device>, BridgeError> {
        Ok(self.fetch_devices().await?)
    }

    async fn get_status(&self, device_id: &DeviceId) -> Result<DeviceStatus, BridgeError> {
        Ok(self.fetch_status(device_id).await?)
    }

    async fn execute_command(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> Result<CommandOutcome, BridgeError> {
        Ok(self.send_command(device_id, command).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use acbridge_domain::capability::Capability;

    const TOKEN: &str = "test-token";

    #[derive(Clone, Default)]
    struct FakeApi {
        base: Arc<Mutex<String>>,
        commands: Arc<Mutex<Vec<Value>>>,
    }

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer test-token")
    }

    async fn list_devices(
        State(api): State<FakeApi>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": "UnauthorizedError", "message": "Unauthorized"}})),
            );
        }
        let base = api.base.lock().unwrap().clone();
        let body = if query.get("page").map(String::as_str) == Some("1") {
            json!({"items": [{"deviceId": "ac-2", "label": "Office", "components": [
                {"id": "main", "capabilities": [{"id": "switch"}]}
            ]}], "_links": {}})
        } else {
            json!({"items": [{"deviceId": "ac-1", "label": "Bedroom", "components": [
                {"id": "main", "capabilities": [{"id": "switch"}, {"id": "temperatureMeasurement"}]}
            ]}], "_links": {"next": {"href": format!("{base}/devices?page=1")}}})
        };
        (StatusCode::OK, Json(body))
    }

    async fn device_status(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        if id != "ac-1" {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": {"code": "NotFoundError", "message": "device not found"}})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({"components": {"main": {"switch": {"switch": {"value": "on"}}}}})),
        )
    }

    async fn device_commands(
        State(api): State<FakeApi>,
        Json(body): Json<Value>,
    ) -> Json<Value> {
        api.commands.lock().unwrap().push(body);
        Json(json!({"results": [{"id": "c-1", "status": "ACCEPTED"}]}))
    }

    async fn spawn_api() -> (FakeApi, SmartThingsClient) {
        let api = FakeApi::default();
        let router = Router::new()
            .route("/v1/devices", get(list_devices))
            .route("/v1/devices/{id}/status", get(device_status))
            .route("/v1/devices/{id}/commands", post(device_commands))
            .with_state(api.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });

        let base = format!("http://{addr}/v1");
        *api.base.lock().unwrap() = base.clone();
        let client = SmartThingsClient::new(&SmartThingsConfig {
            token: TOKEN.to_string(),
            base_url: format!("{base}/"),
            request_timeout_secs: 5,
        })
        .unwrap();
        (api, client)
    }

    #[test]
    fn should_refuse_to_build_without_token() {
        let result = SmartThingsClient::new(&SmartThingsConfig::default());
        assert!(matches!(result, Err(SmartThingsError::MissingToken)));
    }

    #[tokio::test]
    async fn should_follow_pagination_links() {
        let (_, client) = spawn_api().await;

        let devices = client.list_devices().await.unwrap();

        let ids: Vec<_> = devices.iter().map(|d| d.device_id.as_str()).collect();
        assert_eq!(ids, vec!["ac-1", "ac-2"]);
        assert!(devices[0].supports(&Capability::TemperatureMeasurement));
    }

    #[tokio::test]
    async fn should_fetch_status_document() {
        let (_, client) = spawn_api().await;

        let status = client
            .get_status(&DeviceId::new("ac-1").unwrap())
            .await
            .unwrap();

        let main = status.main_component().unwrap();
        assert_eq!(main["switch"]["switch"].value, json!("on"));
    }

    #[tokio::test]
    async fn should_surface_api_errors_as_transport_errors() {
        let (_, client) = spawn_api().await;

        let err = client
            .fetch_status(&DeviceId::new("missing").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            SmartThingsError::Api { status: 404, message } if message == "device not found"
        ));
        assert!(matches!(err.into_domain(), BridgeError::Transport(_)));
    }

    #[tokio::test]
    async fn should_post_command_and_map_accepted_result() {
        let (api, client) = spawn_api().await;

        let outcome = client
            .execute_command(&DeviceId::new("ac-1").unwrap(), &Command::switch(true))
            .await
            .unwrap();

        assert!(outcome.is_success());
        let sent = api.commands.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![json!({"commands": [{
                "component": "main",
                "capability": "switch",
                "command": "on",
                "arguments": []
            }]})]
        );
    }

    #[tokio::test]
    async fn should_reject_wrong_token() {
        let (api, _) = spawn_api().await;
        let base = api.base.lock().unwrap().clone();
        let client = SmartThingsClient::new(&SmartThingsConfig {
            token: "other".to_string(),
            base_url: base,
            request_timeout_secs: 5,
        })
        .unwrap();

        let err = client.fetch_devices().await.unwrap_err();
        assert!(matches!(err, SmartThingsError::Api { status: 401, .. }));
    }
}
