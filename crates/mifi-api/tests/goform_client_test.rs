#![allow(clippy::unwrap_used)]
// Integration tests for `GoformClient` against a wiremock device.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mifi_api::goform::{GET_CMD_PATH, SET_CMD_PATH};
use mifi_api::{Error, GoformClient, TransportConfig, WifiConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GoformClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = GoformClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_set(server: &MockServer, goform_id: &str, result: &str) {
    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains(format!("goformId={goform_id}")))
        .respond_with(ok(json!({ "result": result })))
        .mount(server)
        .await;
}

fn secret(s: &str) -> secrecy::SecretString {
    s.to_string().into()
}

// ── Transport ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_requests_carry_device_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .and(header("Referer", format!("{}/index.html", server.uri()).as_str()))
        .respond_with(ok(json!({ "sms_data_total": "4" })))
        .mount(&server)
        .await;

    assert_eq!(client.sms_count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_held_session_is_sent_as_cookie() {
    let (server, client) = setup().await;
    client.session().set("sid=abc123; path=/");

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(header("Cookie", "sid=abc123"))
        .respond_with(ok(json!({ "sms_data_total": "1" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.sms_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_non_2xx_is_status_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.device_status().await.unwrap_err();
    assert_eq!(err.http_status(), Some(500));
    assert!(matches!(err, Error::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let result = client.connected_devices().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_probe_needs_no_session_and_keeps_held_one() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    client.probe().await.unwrap();
    assert!(!client.session().is_held());

    client.session().set("sid=abc123; path=/");
    client.probe().await.unwrap();
    assert_eq!(client.session().cookie_header().as_deref(), Some("sid=abc123"));
}

#[tokio::test]
async fn test_probe_rejects_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.probe().await.unwrap_err();
    assert_eq!(err.http_status(), Some(503));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_captures_session_cookie() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=LOGIN"))
        .and(body_string_contains("isTest=false"))
        // base64("secret")
        .and(body_string_contains("password=c2VjcmV0"))
        .respond_with(
            ok(json!({ "result": "0" })).insert_header("Set-Cookie", "sid=abc123; path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    client.login("admin", &secret("secret")).await.unwrap();

    assert_eq!(client.session().cookie_header().as_deref(), Some("sid=abc123"));
}

#[tokio::test]
async fn test_login_keeps_every_cookie_the_device_sets() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=LOGIN"))
        .respond_with(
            ok(json!({ "result": "0" }))
                .append_header("Set-Cookie", "lang=en; path=/")
                .append_header("Set-Cookie", "PHPSESSID=abc; path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ok(json!({ "sms_data_total": "0" })))
        .mount(&server)
        .await;

    client.login("admin", &secret("pw")).await.unwrap();
    client.sms_count().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let cookie = requests
        .last()
        .and_then(|r| r.headers.get("cookie"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(cookie.contains("PHPSESSID=abc"), "cookie header: {cookie}");
    assert!(cookie.contains("lang=en"), "cookie header: {cookie}");
}

#[tokio::test]
async fn test_cookie_from_probe_is_sent_on_login() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "PHPSESSID=xyz; path=/")
                .set_body_string("<html></html>"),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=LOGIN"))
        .and(header("Cookie", "PHPSESSID=xyz"))
        .respond_with(ok(json!({ "result": "0" })))
        .expect(1)
        .mount(&server)
        .await;

    client.probe().await.unwrap();
    client.login("admin", &secret("pw")).await.unwrap();

    assert!(client.session().is_held());
    assert_eq!(client.session().cookie_header().as_deref(), Some("PHPSESSID=xyz"));
}

#[tokio::test]
async fn test_cookie_refreshed_by_later_response_is_used() {
    let (server, client) = setup().await;
    client.session().set("sid=old; path=/");

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(query_param("cmd", "sms_data_total"))
        .respond_with(
            ok(json!({ "sms_data_total": "1" })).insert_header("Set-Cookie", "sid=new; path=/"),
        )
        .mount(&server)
        .await;

    client.sms_count().await.unwrap();
    assert_eq!(client.session().cookie_header().as_deref(), Some("sid=new"));
}

#[tokio::test]
async fn test_rejected_login_discards_cookies_it_set() {
    let (server, client) = setup().await;
    client.session().set("sid=old; path=/");

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=LOGIN"))
        .respond_with(
            ok(json!({ "result": "3" })).insert_header("Set-Cookie", "sid=bogus; path=/"),
        )
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("wrong")).await;

    assert!(matches!(result, Err(Error::BadCredentials)), "got: {result:?}");
    assert_eq!(client.session().cookie_header().as_deref(), Some("sid=old"));
}

#[tokio::test]
async fn test_login_code_4_succeeds() {
    let (server, client) = setup().await;
    mount_set(&server, "LOGIN", "4").await;

    client.login("admin", &secret("pw")).await.unwrap();
}

#[tokio::test]
async fn test_login_bad_credentials_keeps_existing_session() {
    let (server, client) = setup().await;
    client.session().set("sid=old; path=/");
    mount_set(&server, "LOGIN", "3").await;

    let result = client.login("admin", &secret("wrong")).await;

    assert!(matches!(result, Err(Error::BadCredentials)), "got: {result:?}");
    assert_eq!(client.session().cookie_header().as_deref(), Some("sid=old"));
}

#[tokio::test]
async fn test_login_unknown_code_is_rejected_with_code() {
    let (server, client) = setup().await;
    mount_set(&server, "LOGIN", "locked").await;

    match client.login("admin", &secret("pw")).await {
        Err(Error::LoginRejected { code }) => assert_eq!(code, "locked"),
        other => panic!("expected LoginRejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_without_result_is_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .respond_with(ok(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("pw")).await;
    assert!(matches!(result, Err(Error::ProtocolFormat { field: "result" })));
}

#[tokio::test]
async fn test_logout_twice_clears_session() {
    let (server, client) = setup().await;
    client.session().set("sid=abc123; path=/");
    mount_set(&server, "LOGOUT", "success").await;

    client.logout().await;
    assert!(!client.session().is_held());

    client.logout().await;
    assert!(!client.session().is_held());
}

#[tokio::test]
async fn test_logout_clears_session_when_device_fails() {
    let (server, client) = setup().await;
    client.session().set("sid=abc123; path=/");

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    client.logout().await;
    assert!(!client.session().is_held());
}

#[tokio::test]
async fn test_is_authenticated_follows_status_fetch() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ok(json!({ "network_type": "LTE" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    assert!(client.is_authenticated().await);
    // Mock exhausted: wiremock answers 404.
    assert!(!client.is_authenticated().await);
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_status_tolerates_bad_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(query_param("multi_data", "1"))
        .and(query_param("isTest", "false"))
        .respond_with(ok(json!({
            "network_type": "LTE",
            "network_provider": "Carrier",
            "ppp_status": "ppp_connected",
            "signalbar": "bad",
            "battery_value": 64,
            "wan_ipaddr": "10.20.30.40",
            "sta_count": "2",
            "realtime_tx_thrpt": "2048",
            "realtime_rx_thrpt": "",
            "realtime_tx_bytes": "123456789",
            "realtime_rx_bytes": ["nope"],
            "model_name": "MF920"
        })))
        .mount(&server)
        .await;

    let status = client.device_status().await.unwrap();
    assert_eq!(status.network_type, "LTE");
    assert_eq!(status.signal_bars, 0);
    assert_eq!(status.battery_level, 64);
    assert_eq!(status.wan_ip, "10.20.30.40");
    assert_eq!(status.connected_devices, 2);
    assert!((status.tx_rate - 2048.0).abs() < f64::EPSILON);
    assert!(status.rx_rate.abs() < f64::EPSILON);
    assert_eq!(status.tx_bytes, 123_456_789);
    assert_eq!(status.rx_bytes, 0);
    assert_eq!(status.imei, "");
    assert_eq!(status.model_name, "MF920");
    assert!(status.is_data_connected());
}

// ── WiFi ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wifi_config_read() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(query_param(
            "cmd",
            "wifi_ssid,wifi_password,security_mode,hide_ssid,wifi_channel,max_client_num",
        ))
        .respond_with(ok(json!({
            "wifi_ssid": "MiFi-1234",
            "wifi_password": "hunter22",
            "security_mode": "WPA2PSK",
            "hide_ssid": "1",
            "wifi_channel": "6",
            "max_client_num": "10"
        })))
        .mount(&server)
        .await;

    let config = client.wifi_config().await.unwrap();
    assert_eq!(
        config,
        WifiConfig {
            ssid: "MiFi-1234".into(),
            password: "hunter22".into(),
            security_mode: "WPA2PSK".into(),
            hidden: true,
            channel: 6,
            max_clients: 10,
        }
    );
}

#[tokio::test]
async fn test_set_wifi_config_omits_unset_numbers() {
    let (server, client) = setup().await;
    mount_set(&server, "SET_WIFI_SSID_PASSWORD", "success").await;

    let config = WifiConfig {
        ssid: "home".into(),
        password: "hunter22".into(),
        security_mode: "WPA2PSK".into(),
        ..WifiConfig::default()
    };
    client.set_wifi_config(&config).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8(requests[0].body.clone()).unwrap();
    assert!(body.contains("wifi_ssid=home"));
    assert!(body.contains("hide_ssid=0"));
    assert!(!body.contains("wifi_channel"));
    assert!(!body.contains("max_client_num"));
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connected_devices() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(query_param("cmd", "station_list"))
        .respond_with(ok(json!({
            "station_list": [
                {
                    "hostname": "laptop",
                    "ipaddress": "192.168.0.100",
                    "macaddress": "AA:BB:CC:DD:EE:FF",
                    "connected_time": "360"
                },
                "garbage",
                { "hostname": "phone", "is_blocked": "1" }
            ]
        })))
        .mount(&server)
        .await;

    let devices = client.connected_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].hostname, "laptop");
    assert_eq!(devices[0].connected_time, Some(360));
    assert!(!devices[0].is_blocked);
    assert_eq!(devices[1].connected_time, None);
    assert!(devices[1].is_blocked);
}

#[tokio::test]
async fn test_missing_station_list_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    assert!(client.connected_devices().await.unwrap().is_empty());
}

// ── SMS ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sms_decodes_messages() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .and(query_param("page", "0"))
        .and(query_param("data_per_page", "50"))
        .and(query_param("mem_store", "1"))
        .and(query_param("tags", "10"))
        .and(query_param("order_by", "order by id desc"))
        .respond_with(ok(json!({
            "messages": [
                {
                    "id": "2",
                    "number": "+15550100",
                    "content": "48656C6C6F",
                    "tag": "1",
                    "date": "25,12,20,18,38,02,+8"
                },
                {
                    "id": "1",
                    "number": "+15550199",
                    "content": "ZZ",
                    "tag": "2",
                    "date": "garbage"
                }
            ]
        })))
        .mount(&server)
        .await;

    let messages = client.list_sms(0, 50).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(
        messages[0].timestamp.map(|t| t.to_string()).as_deref(),
        Some("2025-12-20 18:38:02")
    );
    assert_eq!(messages[1].content, "ZZ");
    assert_eq!(messages[1].timestamp, None);
}

#[tokio::test]
async fn test_missing_messages_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(GET_CMD_PATH))
        .respond_with(ok(json!({ "sms_data_total": "0" })))
        .mount(&server)
        .await;

    assert!(client.list_sms(0, 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_sms_form() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=SEND_SMS"))
        .and(body_string_contains("Number=%2B15550100"))
        .and(body_string_contains("MessageBody=hi+there"))
        .and(body_string_contains("encode_type=GSM7_default"))
        .and(body_string_contains("ID=-1"))
        .respond_with(ok(json!({ "result": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    client.send_sms("+15550100", "hi there").await.unwrap();
}

#[tokio::test]
async fn test_delete_sms_joins_ids() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .and(body_string_contains("goformId=DELETE_SMS"))
        .and(body_string_contains("msg_id=3%3B7"))
        .respond_with(ok(json!({ "result": "success" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_sms(&["3".to_owned(), "7".to_owned()])
        .await
        .unwrap();
}

// ── Write result classification ─────────────────────────────────────

#[tokio::test]
async fn test_every_success_token_accepted_on_every_action() {
    for token in ["0", "Success", "success"] {
        let (server, client) = setup().await;
        for id in [
            "CONNECT_NETWORK",
            "DISCONNECT_NETWORK",
            "REBOOT_DEVICE",
            "POWEROFF_DEVICE",
            "SEND_SMS",
            "DELETE_SMS",
            "SET_WIFI_SSID_PASSWORD",
        ] {
            mount_set(&server, id, token).await;
        }

        client.connect_network().await.unwrap();
        client.disconnect_network().await.unwrap();
        client.reboot_device().await.unwrap();
        client.shutdown_device().await.unwrap();
        client.send_sms("123", "x").await.unwrap();
        client.delete_sms(&["1".to_owned()]).await.unwrap();
        client.set_wifi_config(&WifiConfig::default()).await.unwrap();
    }
}

#[tokio::test]
async fn test_failure_keeps_literal_text() {
    let (server, client) = setup().await;
    mount_set(&server, "REBOOT_DEVICE", "failure").await;

    let err = client.reboot_device().await.unwrap_err();
    assert_eq!(err.to_string(), "failed to reboot device: failure");
}

#[tokio::test]
async fn test_missing_result_is_protocol_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(SET_CMD_PATH))
        .respond_with(ok(json!({})))
        .mount(&server)
        .await;

    let result = client.connect_network().await;
    assert!(matches!(result, Err(Error::ProtocolFormat { field: "result" })));
}
