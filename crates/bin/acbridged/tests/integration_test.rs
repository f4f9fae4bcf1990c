//! End-to-end tests for the full acbridged stack.
//!
//! Each test starts a fake SmartThings REST API on a loopback port, wires the
//! real client, platform, controllers and axum router against it, and
//! exercises the HTTP layer via `tower::ServiceExt::oneshot`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use acbridge_adapter_http_axum::host::InMemoryAccessoryHost;
use acbridge_adapter_http_axum::router;
use acbridge_adapter_http_axum::state::AppState;
use acbridge_adapter_smartthings::{SmartThingsClient, SmartThingsConfig};
use acbridge_app::event_bus::InProcessEventBus;
use acbridge_app::platform::{Platform, PlatformConfig};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const TOKEN: &str = "integration-token";

// ---------------------------------------------------------------------------
// Fake SmartThings API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Cloud {
    devices: Vec<Value>,
    statuses: HashMap<String, Value>,
    commands: Vec<(String, Value)>,
    /// Result reported for every command; `ACCEPTED` when unset.
    command_result: Option<String>,
}

#[derive(Clone, Default)]
struct FakeApi {
    cloud: Arc<Mutex<Cloud>>,
}

impl FakeApi {
    fn with_default_devices() -> Self {
        let api = Self::default();
        {
            let mut cloud = api.cloud.lock().unwrap();
            cloud.devices = vec![
                device_json(
                    "ac-1",
                    "Living Room AC",
                    &[
                        "switch",
                        "temperatureMeasurement",
                        "thermostatCoolingSetpoint",
                        "airConditionerMode",
                        "airConditionerFanMode",
                        "relativeHumidityMeasurement",
                    ],
                ),
                device_json(
                    "ac-2",
                    "Bedroom AC",
                    &["switch", "temperatureMeasurement", "thermostatCoolingSetpoint"],
                ),
                device_json("tv-1", "Television", &["switch", "audioVolume"]),
            ];
            cloud
                .statuses
                .insert("ac-1".to_string(), status_json("on", 26.5, 24.0, Some("cool")));
            cloud
                .statuses
                .insert("ac-2".to_string(), status_json("off", 21.0, 25.0, None));
        }
        api
    }

    fn remove_device(&self, id: &str) {
        self.cloud
            .lock()
            .unwrap()
            .devices
            .retain(|device| device["deviceId"] != id);
    }

    fn fail_commands(&self) {
        self.cloud.lock().unwrap().command_result = Some("FAILED".to_string());
    }

    fn commands(&self) -> Vec<(String, Value)> {
        self.cloud.lock().unwrap().commands.clone()
    }

    async fn serve(&self) -> String {
        let router = Router::new()
            .route("/v1/devices", get(list_devices))
            .route("/v1/devices/{id}/status", get(device_status))
            .route("/v1/devices/{id}/commands", post(device_commands))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}/v1")
    }
}

fn device_json(id: &str, label: &str, capabilities: &[&str]) -> Value {
    let capabilities: Vec<Value> = capabilities.iter().map(|id| json!({"id": id})).collect();
    json!({
        "deviceId": id,
        "label": label,
        "manufacturerName": "Samsung Electronics",
        "deviceTypeId": "da-ac-room-000001",
        "presentationId": format!("serial-{id}"),
        "components": [{"id": "main", "capabilities": capabilities}],
    })
}

fn status_json(switch: &str, temperature: f64, setpoint: f64, mode: Option<&str>) -> Value {
    let mut main = json!({
        "switch": {"switch": {"value": switch}},
        "temperatureMeasurement": {"temperature": {"value": temperature, "unit": "C"}},
        "thermostatCoolingSetpoint": {"coolingSetpoint": {"value": setpoint, "unit": "C"}},
    });
    if let Some(mode) = mode {
        main["airConditionerMode"] = json!({"airConditionerMode": {"value": mode}});
        main["airConditionerFanMode"] = json!({"fanMode": {"value": "auto"}});
        main["relativeHumidityMeasurement"] = json!({"humidity": {"value": 45, "unit": "%"}});
    }
    json!({"components": {"main": main}})
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": {"code": "UnauthorizedError", "message": "Unauthorized"}})),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

async fn list_devices(State(api): State<FakeApi>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let items = api.cloud.lock().unwrap().devices.clone();
    (StatusCode::OK, Json(json!({"items": items, "_links": {}})))
}

async fn device_status(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    match api.cloud.lock().unwrap().statuses.get(&id) {
        Some(status) => (StatusCode::OK, Json(status.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": "NotFoundError", "message": "device not found"}})),
        ),
    }
}

async fn device_commands(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut cloud = api.cloud.lock().unwrap();
    cloud.commands.push((id.clone(), body.clone()));
    let result = cloud
        .command_result
        .clone()
        .unwrap_or_else(|| "ACCEPTED".to_string());

    if result == "ACCEPTED" {
        if let Some(main) = cloud
            .statuses
            .get_mut(&id)
            .map(|status| &mut status["components"]["main"])
        {
            let command = &body["commands"][0];
            match command["command"].as_str() {
                Some("on" | "off") => {
                    main["switch"]["switch"]["value"] = command["command"].clone();
                }
                Some("setCoolingSetpoint") => {
                    main["thermostatCoolingSetpoint"]["coolingSetpoint"]["value"] =
                        command["arguments"][0].clone();
                }
                Some("setAirConditionerMode") => {
                    main["airConditionerMode"]["airConditionerMode"]["value"] =
                        command["arguments"][0].clone();
                }
                _ => {}
            }
        }
    }

    (
        StatusCode::OK,
        Json(json!({"results": [{"id": "cmd-1", "status": result}]})),
    )
}

// ---------------------------------------------------------------------------
// Stack wiring
// ---------------------------------------------------------------------------

fn client(base_url: String, token: &str) -> SmartThingsClient {
    SmartThingsClient::new(&SmartThingsConfig {
        token: token.to_string(),
        base_url,
        request_timeout_secs: 5,
    })
    .unwrap()
}

/// Build a fully-wired router against `api`, registering into `host`.
async fn bridge(api: &FakeApi, host: Arc<InMemoryAccessoryHost>) -> Router {
    let base_url = api.serve().await;
    let event_bus = InProcessEventBus::default();
    let platform = Platform::new(
        client(base_url, TOKEN),
        host,
        event_bus.clone(),
        PlatformConfig::default(),
    );
    let registry = platform.start().await.expect("discovery should succeed");
    router::build(AppState::new(registry, event_bus))
}

async fn app(api: &FakeApi) -> Router {
    bridge(api, Arc::new(InMemoryAccessoryHost::new())).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn temp_cache(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "acbridged-{name}-{}.json",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let api = FakeApi::with_default_devices();
    let resp = app(&api).await.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_expose_only_air_conditioners() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, body) = send(&app, get_request("/api/accessories")).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|accessory| accessory["device_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["ac-1", "ac-2"]);
    assert_eq!(body[0]["information"]["manufacturer"], "Samsung Electronics");
    assert_eq!(body[0]["information"]["serial_number"], "serial-ac-1");
    assert_eq!(body[0]["stale"], false);
}

#[tokio::test]
async fn should_fail_discovery_with_rejected_token() {
    let api = FakeApi::with_default_devices();
    let base_url = api.serve().await;
    let platform = Platform::new(
        client(base_url, "wrong-token"),
        InMemoryAccessoryHost::new(),
        InProcessEventBus::default(),
        PlatformConfig::default(),
    );

    assert!(platform.start().await.is_err());
}

// ---------------------------------------------------------------------------
// Characteristic reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_read_values_polled_at_startup() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, body) = send(&app, get_request("/api/accessories/ac-1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["values"]["Active"], 1);
    assert_eq!(body["values"]["CurrentHeaterCoolerState"], 3);
    assert_eq!(body["values"]["TargetHeaterCoolerState"], 2);
    assert_eq!(body["values"]["CurrentTemperature"], 26.5);
    assert_eq!(body["values"]["CoolingThresholdTemperature"], 24.0);
    assert_eq!(body["values"]["CurrentRelativeHumidity"], 45.0);
}

#[tokio::test]
async fn should_hide_mode_and_humidity_for_basic_unit() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (_, body) = send(&app, get_request("/api/accessories/ac-2")).await;

    assert_eq!(body["values"]["Active"], 0);
    assert_eq!(body["values"]["CurrentHeaterCoolerState"], 0);
    assert!(body["values"].get("TargetHeaterCoolerState").is_none());
    assert!(body["values"].get("CurrentRelativeHumidity").is_none());
}

#[tokio::test]
async fn should_return_status_record() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, body) = send(&app, get_request("/api/accessories/ac-1/status")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "cool");
    assert_eq!(body["fan_mode"], "auto");
    assert_eq!(body["active"], true);
}

// ---------------------------------------------------------------------------
// Characteristic writes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_send_setpoint_command() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, body) = send(
        &app,
        put_json(
            "/api/accessories/ac-1/characteristics/CoolingThresholdTemperature",
            &json!({"value": 22}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 22);
    let commands = api.commands();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].0, "ac-1");
    assert_eq!(
        commands[0].1,
        json!({"commands": [{
            "component": "main",
            "capability": "thermostatCoolingSetpoint",
            "command": "setCoolingSetpoint",
            "arguments": [22],
        }]})
    );
}

#[tokio::test]
async fn should_translate_target_state_to_mode_command() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, _) = send(
        &app,
        put_json(
            "/api/accessories/ac-1/characteristics/TargetHeaterCoolerState",
            &json!({"value": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let commands = api.commands();
    assert_eq!(commands[0].1["commands"][0]["command"], "setAirConditionerMode");
    assert_eq!(commands[0].1["commands"][0]["arguments"], json!(["heat"]));

    let (_, body) = send(
        &app,
        get_request("/api/accessories/ac-1/characteristics/TargetHeaterCoolerState"),
    )
    .await;
    assert_eq!(body["value"], 1);
}

#[tokio::test]
async fn should_not_send_command_for_invalid_write() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;

    let (status, _) = send(
        &app,
        put_json(
            "/api/accessories/ac-1/characteristics/CoolingThresholdTemperature",
            &json!({"value": 40}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(api.commands().is_empty());
}

#[tokio::test]
async fn should_revert_cached_value_when_command_fails() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;
    api.fail_commands();

    let (status, body) = send(
        &app,
        put_json(
            "/api/accessories/ac-1/characteristics/Active",
            &json!({"value": 0}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("failed"));

    let (_, body) = send(&app, get_request("/api/accessories/ac-1/characteristics/Active")).await;
    assert_eq!(body["value"], 1);
}

#[tokio::test]
async fn should_pick_up_remote_changes_on_refresh() {
    let api = FakeApi::with_default_devices();
    let app = app(&api).await;
    api.cloud
        .lock()
        .unwrap()
        .statuses
        .insert("ac-2".to_string(), status_json("on", 23.5, 25.0, None));

    let refresh = Request::builder()
        .method("POST")
        .uri("/api/accessories/ac-2/refresh")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, refresh).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);
    assert_eq!(body["current_temperature"], 23.5);
}

// ---------------------------------------------------------------------------
// Accessory cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_restore_accessories_from_cache_across_restarts() {
    let path = temp_cache("restore");
    let api = FakeApi::with_default_devices();

    let first = Arc::new(InMemoryAccessoryHost::with_cache_file(&path).unwrap());
    let app = bridge(&api, Arc::clone(&first)).await;
    let (_, before) = send(&app, get_request("/api/accessories/ac-1")).await;
    assert_eq!(first.accessories().len(), 2);

    let second = Arc::new(InMemoryAccessoryHost::with_cache_file(&path).unwrap());
    assert_eq!(second.accessories().len(), 2);
    let app = bridge(&api, Arc::clone(&second)).await;
    let (_, after) = send(&app, get_request("/api/accessories/ac-1")).await;

    assert_eq!(before["accessory_id"], after["accessory_id"]);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn should_unregister_cached_accessory_for_vanished_device() {
    let path = temp_cache("vanished");
    let api = FakeApi::with_default_devices();
    bridge(&api, Arc::new(InMemoryAccessoryHost::with_cache_file(&path).unwrap())).await;

    api.remove_device("ac-2");
    let host = Arc::new(InMemoryAccessoryHost::with_cache_file(&path).unwrap());
    let app = bridge(&api, Arc::clone(&host)).await;

    let ids: Vec<String> = host
        .accessories()
        .iter()
        .map(|accessory| accessory.device_id().to_string())
        .collect();
    assert_eq!(ids, vec!["ac-1"]);
    let (status, _) = send(&app, get_request("/api/accessories/ac-2")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let _ = std::fs::remove_file(&path);
}
