//! 폴링 통합 테스트
//!
//! wiremock으로 Jolokia 엔드포인트를 모킹하고 전체 폴링 사이클을 검증합니다.

use serde_json::json;
use tokio::sync::mpsc;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flume_zabbix_exporter::collector::JolokiaClient;
use flume_zabbix_exporter::config::Config;
use flume_zabbix_exporter::poller::PollCycle;
use flume_zabbix_exporter::zabbix::{ItemQueue, ZabbixItem};

fn channel_attrs() -> serde_json::Value {
    json!({
        "ChannelCapacity": 10000,
        "ChannelFillPercentage": 1.5,
        "ChannelSize": 150,
        "EventPutAttemptCount": 1000,
        "EventPutSuccessCount": 998,
        "EventTakeAttemptCount": 900,
        "EventTakeSuccessCount": 848,
        "StartTime": 1609459000,
        "StopTime": 0
    })
}

fn sink_attrs() -> serde_json::Value {
    json!({
        "BatchCompleteCount": 50,
        "BatchEmptyCount": 3,
        "BatchUnderflowCount": 7,
        "ConnectionClosedCount": 1,
        "ConnectionCreatedCount": 2,
        "ConnectionFailedCount": 0,
        "EventDrainAttemptCount": 848,
        "EventDrainSuccessCount": 848,
        "StartTime": 1609459000,
        "StopTime": 0
    })
}

fn source_attrs() -> serde_json::Value {
    json!({
        "AppendAcceptedCount": 0,
        "AppendBatchAcceptedCount": 0,
        "AppendBatchReceivedCount": 0,
        "AppendReceivedCount": 0,
        "EventAcceptedCount": 1000,
        "EventReceivedCount": 1000,
        "OpenConnectionCount": 4,
        "StartTime": 1609459000,
        "StopTime": 0
    })
}

fn read_response(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "request": {"type": "read"},
        "value": value,
        "timestamp": 1609459200,
        "status": 200
    }))
}

async fn mount_read(server: &MockServer, mbean: &str, value: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/jolokia/"))
        .and(body_partial_json(json!({"mbean": mbean})))
        .respond_with(read_response(value))
        .mount(server)
        .await;
}

fn test_setup(server_uri: &str) -> (Config, PollCycle, mpsc::Receiver<ZabbixItem>) {
    let url = Url::parse(server_uri).unwrap();

    let mut config = Config::default();
    config.zabbix.hostname = "flume-host".to_string();
    config.jolokia.host = url.host_str().unwrap().to_string();
    config.jolokia.port = url.port().unwrap();
    config.jolokia.timeout_secs = 5;

    let client = JolokiaClient::new(&config.jolokia.base_url(), 5).unwrap();
    let (queue, rx) = ItemQueue::bounded(1024);
    let cycle = PollCycle::new(client, queue, &config);

    (config, cycle, rx)
}

fn drain(rx: &mut mpsc::Receiver<ZabbixItem>) -> Vec<ZabbixItem> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

fn keys_with_prefix<'a>(items: &'a [ZabbixItem], prefix: &str) -> Vec<&'a str> {
    items
        .iter()
        .map(|i| i.key.as_str())
        .filter(|k| k.starts_with(prefix))
        .collect()
}

#[tokio::test]
async fn test_first_poll_emits_discovery_then_steady_state() {
    let server = MockServer::start().await;

    mount_read(
        &server,
        "org.apache.flume.channel:type=*",
        json!({
            "org.apache.flume.channel:type=ch1": channel_attrs(),
            "org.apache.flume.channel:type=ch2": channel_attrs()
        }),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.sink:type=*",
        json!({"org.apache.flume.sink:type=k1": sink_attrs()}),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.source:type=*",
        json!({"org.apache.flume.source:type=src1": source_attrs()}),
    )
    .await;

    let (_config, mut cycle, mut rx) = test_setup(&server.uri());

    // First cycle: every category is new, so each emits one discovery item
    cycle.run_once().await;
    let items = drain(&mut rx);

    // 3 discovery + 2x9 channel + 1x10 sink + 1x9 source
    assert_eq!(items.len(), 40);

    let discoveries: Vec<&ZabbixItem> =
        items.iter().filter(|i| i.key.ends_with(".discovery")).collect();
    assert_eq!(discoveries.len(), 3);
    for discovery in &discoveries {
        assert_eq!(discovery.clock, None, "discovery clock is assigned downstream");
        assert_eq!(discovery.host, "flume-host");
    }

    // Discovery precedes the category's metric items
    let channel_discovery_pos = items
        .iter()
        .position(|i| i.key == "flume.channel.discovery")
        .unwrap();
    let first_channel_metric_pos = items
        .iter()
        .position(|i| i.key.starts_with("flume.channel["))
        .unwrap();
    assert!(channel_discovery_pos < first_channel_metric_pos);

    // Metric items carry the endpoint timestamp
    assert_eq!(items[first_channel_metric_pos].clock, Some(1609459200));
    assert_eq!(
        keys_with_prefix(&items, "flume.channel[").len(),
        18,
        "2 channels x 9 attributes"
    );

    // Second cycle: same component sets, no discovery
    cycle.run_once().await;
    let items = drain(&mut rx);

    assert_eq!(items.len(), 37);
    assert!(items.iter().all(|i| !i.key.ends_with(".discovery")));
}

#[tokio::test]
async fn test_grown_component_set_emits_one_discovery() {
    let server = MockServer::start().await;

    // First poll sees one channel, every later poll sees two
    Mock::given(method("POST"))
        .and(path("/jolokia/"))
        .and(body_partial_json(
            json!({"mbean": "org.apache.flume.channel:type=*"}),
        ))
        .respond_with(read_response(
            json!({"org.apache.flume.channel:type=ch1": channel_attrs()}),
        ))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_read(
        &server,
        "org.apache.flume.channel:type=*",
        json!({
            "org.apache.flume.channel:type=ch1": channel_attrs(),
            "org.apache.flume.channel:type=ch2": channel_attrs()
        }),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.sink:type=*",
        json!({"org.apache.flume.sink:type=k1": sink_attrs()}),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.source:type=*",
        json!({"org.apache.flume.source:type=src1": source_attrs()}),
    )
    .await;

    let (_config, mut cycle, mut rx) = test_setup(&server.uri());

    cycle.run_once().await;
    let items = drain(&mut rx);
    assert_eq!(keys_with_prefix(&items, "flume.channel[").len(), 9);

    cycle.run_once().await;
    let items = drain(&mut rx);

    let discoveries: Vec<&ZabbixItem> = items
        .iter()
        .filter(|i| i.key == "flume.channel.discovery")
        .collect();
    assert_eq!(discoveries.len(), 1);

    // The payload lists both qualifiers
    let flume_zabbix_exporter::zabbix::ItemValue::Text(ref payload) = discoveries[0].value
    else {
        panic!("Expected text payload");
    };
    let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(
        parsed,
        json!({"data": [{"{#MBEAN}": "type=ch1"}, {"{#MBEAN}": "type=ch2"}]})
    );

    assert_eq!(
        keys_with_prefix(&items, "flume.channel[").len(),
        18,
        "both channels extracted after the set grew"
    );
}

#[tokio::test]
async fn test_missing_attribute_aborts_only_that_category() {
    let server = MockServer::start().await;

    // Channel response lacks ChannelCapacity
    mount_read(
        &server,
        "org.apache.flume.channel:type=*",
        json!({
            "org.apache.flume.channel:type=ch1": {"ChannelSize": 150}
        }),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.sink:type=*",
        json!({"org.apache.flume.sink:type=k1": sink_attrs()}),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.source:type=*",
        json!({"org.apache.flume.source:type=src1": source_attrs()}),
    )
    .await;

    let (_config, mut cycle, mut rx) = test_setup(&server.uri());

    cycle.run_once().await;
    let items = drain(&mut rx);

    // Zero channel metric items, but the other categories are unaffected
    assert!(keys_with_prefix(&items, "flume.channel[").is_empty());
    assert_eq!(keys_with_prefix(&items, "flume.sink[").len(), 10);
    assert_eq!(keys_with_prefix(&items, "flume.source[").len(), 9);
}

#[tokio::test]
async fn test_transport_error_leaves_tracker_unchanged() {
    let server = MockServer::start().await;

    let channel_value = json!({"org.apache.flume.channel:type=ch1": channel_attrs()});

    // Poll 1: success. Poll 2: HTTP 500. Poll 3: success, same set.
    Mock::given(method("POST"))
        .and(path("/jolokia/"))
        .and(body_partial_json(
            json!({"mbean": "org.apache.flume.channel:type=*"}),
        ))
        .respond_with(read_response(channel_value.clone()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/jolokia/"))
        .and(body_partial_json(
            json!({"mbean": "org.apache.flume.channel:type=*"}),
        ))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_read(
        &server,
        "org.apache.flume.channel:type=*",
        channel_value.clone(),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.sink:type=*",
        json!({"org.apache.flume.sink:type=k1": sink_attrs()}),
    )
    .await;
    mount_read(
        &server,
        "org.apache.flume.source:type=*",
        json!({"org.apache.flume.source:type=src1": source_attrs()}),
    )
    .await;

    let (_config, mut cycle, mut rx) = test_setup(&server.uri());

    cycle.run_once().await;
    let items = drain(&mut rx);
    assert_eq!(keys_with_prefix(&items, "flume.channel[").len(), 9);

    // The failed poll produces nothing for the channel category, but the
    // other two still run
    cycle.run_once().await;
    let items = drain(&mut rx);
    assert!(keys_with_prefix(&items, "flume.channel[").is_empty());
    assert_eq!(keys_with_prefix(&items, "flume.sink[").len(), 10);
    assert_eq!(keys_with_prefix(&items, "flume.source[").len(), 9);

    // Recovery with the same component set: no new discovery
    cycle.run_once().await;
    let items = drain(&mut rx);
    assert_eq!(keys_with_prefix(&items, "flume.channel[").len(), 9);
    assert!(items.iter().all(|i| i.key != "flume.channel.discovery"));
}

#[tokio::test]
async fn test_exact_mode_skips_discovery() {
    let server = MockServer::start().await;

    mount_read(
        &server,
        "org.apache.flume.channel:type=memoryChannel",
        channel_attrs(),
    )
    .await;
    mount_read(&server, "org.apache.flume.sink:type=hdfsSink", sink_attrs()).await;
    mount_read(
        &server,
        "org.apache.flume.source:type=avroSource",
        source_attrs(),
    )
    .await;

    let url = Url::parse(&server.uri()).unwrap();
    let mut config = Config::default();
    config.zabbix.hostname = "flume-host".to_string();
    config.jolokia.host = url.host_str().unwrap().to_string();
    config.jolokia.port = url.port().unwrap();
    config.flume.channel = Some("memoryChannel".to_string());
    config.flume.sink = Some("hdfsSink".to_string());
    config.flume.source = Some("avroSource".to_string());

    let client = JolokiaClient::new(&config.jolokia.base_url(), 5).unwrap();
    let (queue, mut rx) = ItemQueue::bounded(1024);
    let mut cycle = PollCycle::new(client, queue, &config);

    cycle.run_once().await;
    let items = drain(&mut rx);

    // 9 + 10 + 9, keyed by the configured names, no discovery at all
    assert_eq!(items.len(), 28);
    assert!(items.iter().all(|i| !i.key.ends_with(".discovery")));
    assert!(items
        .iter()
        .any(|i| i.key == "flume.channel[memoryChannel,ChannelCapacity]"));
    assert!(items
        .iter()
        .any(|i| i.key == "flume.sink[hdfsSink,BatchCompleteCount]"));
}

#[tokio::test]
async fn test_empty_wildcard_result() {
    let server = MockServer::start().await;

    mount_read(&server, "org.apache.flume.channel:type=*", json!({})).await;
    mount_read(&server, "org.apache.flume.sink:type=*", json!({})).await;
    mount_read(&server, "org.apache.flume.source:type=*", json!({})).await;

    let (_config, mut cycle, mut rx) = test_setup(&server.uri());

    cycle.run_once().await;
    let items = drain(&mut rx);

    // Empty set matches the tracker's initial state: nothing to report
    assert!(items.is_empty());
}
