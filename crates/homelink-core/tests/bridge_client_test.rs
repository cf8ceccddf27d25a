#![allow(clippy::unwrap_used)]
// Integration tests for `BridgeClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use homelink_core::{BridgeClient, BridgeConfig, CharacteristicValue, CoreError, Device};

// ── Helpers ─────────────────────────────────────────────────────────

fn client(server: &MockServer) -> BridgeClient {
    let mut config = BridgeConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "admin",
        SecretString::from("hunter2".to_string()),
    );
    // Zero cache window: every cacheable read goes to the network,
    // keeping request counts deterministic.
    config.cache_expiration = Duration::ZERO;
    BridgeClient::new(&config).unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}

fn lamp_json(unique_id: &str, on: bool, brightness: i64) -> Value {
    json!({
        "aid": 5,
        "iid": 8,
        "uuid": "00000043-0000-1000-8000-0026BB765291",
        "type": "Lightbulb",
        "humanType": "Lightbulb",
        "serviceName": "Desk Lamp",
        "serviceCharacteristics": [
            {
                "aid": 5,
                "iid": 10,
                "uuid": "00000025-0000-1000-8000-0026BB765291",
                "type": "On",
                "serviceType": "Lightbulb",
                "serviceName": "Desk Lamp",
                "description": "On",
                "value": on,
                "format": "bool",
                "perms": ["ev", "pr", "pw"],
                "canRead": true,
                "canWrite": true,
                "ev": true,
            },
            {
                "aid": 5,
                "iid": 11,
                "uuid": "00000008-0000-1000-8000-0026BB765291",
                "type": "Brightness",
                "serviceType": "Lightbulb",
                "serviceName": "Desk Lamp",
                "description": "Brightness",
                "value": brightness,
                "format": "int",
                "perms": ["ev", "pr", "pw"],
                "canRead": true,
                "canWrite": true,
                "ev": true,
                "maxValue": 100,
                "minValue": 0,
                "minStep": 1,
                "unit": "percentage",
            },
        ],
        "accessoryInformation": {
            "Manufacturer": "Tasmota",
            "Model": "Generic",
            "Name": "Desk Lamp",
            "Serial Number": "ABC123",
            "Firmware Revision": "9.5.0",
        },
        "values": {"On": on, "Brightness": brightness},
        "instance": {
            "name": "Homebridge 1234",
            "username": "0E:AA:BB:CC:DD:EE",
            "ipAddress": "192.168.1.20",
            "port": 51826,
            "services": [],
            "connectionFailedCount": 0,
        },
        "uniqueId": unique_id,
    })
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn layout_parses_rooms_in_server_order() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/accessories/layout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "name": "Bedroom",
                "services": [{"uniqueId": "bbb", "aid": 2, "iid": 8, "uuid": "u-2"}],
            },
            {
                "name": "Living Room",
                "services": [
                    {"uniqueId": "aaa", "aid": 1, "iid": 8, "uuid": "u-1"},
                    {"uniqueId": "ccc", "aid": 3, "iid": 8, "uuid": "u-3"},
                ],
            },
        ])))
        .mount(&server)
        .await;

    let rooms = client(&server).get_accessory_layout().await.unwrap();
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].name, "Bedroom");
    assert_eq!(rooms[1].services[0].unique_id, "aaa");
    assert_eq!(rooms[1].services[1].unique_id, "ccc");
}

#[tokio::test]
async fn bulk_accessories_parse_and_filter() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let mut lamp = lamp_json("c0ffee", false, 40);
    // Append a deny-listed characteristic; it must not survive parsing.
    lamp["serviceCharacteristics"]
        .as_array_mut()
        .unwrap()
        .push(json!({
            "aid": 5,
            "iid": 12,
            "uuid": "0000024B-0000-1000-8000-0026BB765291",
            "type": "CharacteristicValueTransitionControl",
            "serviceType": "Lightbulb",
            "serviceName": "Desk Lamp",
            "description": "Characteristic Value Transition Control",
            "value": null,
            "format": "tlv8",
            "perms": ["pr", "pw"],
            "canRead": true,
            "canWrite": true,
            "ev": false,
        }));

    Mock::given(method("GET"))
        .and(path("/api/accessories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([lamp])))
        .mount(&server)
        .await;

    let devices = client(&server).get_accessories().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].service_characteristics.len(), 2);
    assert!(
        devices[0]
            .characteristic("CharacteristicValueTransitionControl")
            .is_none()
    );
}

#[tokio::test]
async fn malformed_accessory_is_a_parse_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"aid": 5})))
        .mount(&server)
        .await;

    let result = client(&server).get_accessory("c0ffee").await;
    assert!(
        matches!(result, Err(CoreError::Parse(_))),
        "expected Parse error, got: {result:?}"
    );
}

#[tokio::test]
async fn pairings_pass_through_unparsed() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/server/pairings"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"name": "Homebridge 1234"}])),
        )
        .mount(&server)
        .await;

    let pairings = client(&server).get_pairings().await.unwrap();
    assert_eq!(pairings, json!([{"name": "Homebridge 1234"}]));
}

// ── Updates ─────────────────────────────────────────────────────────

#[tokio::test]
async fn update_puts_each_change_then_returns_controller_state() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // The controller echoes back its own state, which may differ from
    // the locally set value.
    Mock::given(method("GET"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lamp_json("c0ffee", true, 100)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/accessories/c0ffee"))
        .and(body_json(json!({"characteristicType": "On", "value": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut device = Device::from_json(lamp_json("c0ffee", false, 40)).unwrap();
    device.set_characteristic("On", 1_i64).unwrap();

    let updated = client(&server)
        .update_accessory(&device)
        .await
        .unwrap();

    assert_eq!(
        updated.characteristic("On").unwrap().value,
        Some(CharacteristicValue::Bool(true))
    );
    assert!(updated.changed_characteristics().is_empty());
}

#[tokio::test]
async fn first_put_failure_aborts_and_skips_refetch() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/accessories/c0ffee"))
        .and(body_json(json!({"characteristicType": "On", "value": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/accessories/c0ffee"))
        .and(body_json(json!({"characteristicType": "Brightness", "value": 60})))
        .respond_with(ResponseTemplate::new(500).set_body_string("controller on fire"))
        .expect(1)
        .mount(&server)
        .await;

    // No re-fetch after a failed PUT sequence.
    Mock::given(method("GET"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lamp_json("c0ffee", true, 60)))
        .expect(0)
        .mount(&server)
        .await;

    let mut device = Device::from_json(lamp_json("c0ffee", false, 40)).unwrap();
    device.set_characteristic("On", true).unwrap();
    device.set_characteristic("Brightness", 60_i64).unwrap();

    let result = client(&server).update_accessory(&device).await;
    match result {
        Err(CoreError::Api(homelink_api::Error::Upstream { status, .. })) => {
            assert_eq!(status, 500);
        }
        other => panic!("expected Upstream error, got: {other:?}"),
    }
}

#[tokio::test]
async fn refetch_failure_after_applied_puts_propagates() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let mut device = Device::from_json(lamp_json("c0ffee", false, 40)).unwrap();
    device.set_characteristic("On", true).unwrap();

    // The PUT landed; the re-fetch error still surfaces as-is.
    let result = client(&server).update_accessory(&device).await;
    assert!(
        matches!(
            result,
            Err(CoreError::Api(homelink_api::Error::Upstream { status: 502, .. }))
        ),
        "expected Upstream error, got: {result:?}"
    );
}

#[tokio::test]
async fn update_with_no_pending_changes_only_refetches() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/accessories/c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lamp_json("c0ffee", false, 40)))
        .expect(1)
        .mount(&server)
        .await;

    let device = Device::from_json(lamp_json("c0ffee", false, 40)).unwrap();
    let updated = client(&server).update_accessory(&device).await.unwrap();
    assert_eq!(updated.unique_id, "c0ffee");
}
