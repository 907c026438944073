#![allow(clippy::unwrap_used)]
// End-to-end poll cycles against a mock telemetry source.

use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ctewatch_api::{Endpoint, TelemetryClient};
use ctewatch_core::format::PLACEHOLDER;
use ctewatch_core::{
    ArcSink, ConnectivityState, CycleError, Dashboard, OverlapPolicy, Poller, PollerConfig,
    RecordingPresenter, TextSink, Transition, run_cycle,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, TelemetryClient) {
    let server = MockServer::start().await;
    let client = TelemetryClient::with_client(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

async fn mount(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_healthy(server: &MockServer) {
    mount(
        server,
        "/api/stats",
        ResponseTemplate::new(200).set_body_json(json!({
            "uptime": 90061,
            "connections": {"active": 5, "total": 100, "success": 95, "failed": 5},
            "traffic": {"sent": 1536, "received": 512},
            "routing": {"bypassed": 0, "tunneled": 0},
            "protocols": {"HTTP": 2, "SOCKS5": 1, "Shadowsocks": 1}
        })),
    )
    .await;
    mount(
        server,
        "/api/chaos",
        ResponseTemplate::new(200).set_body_json(json!({
            "lyapunov_exponent": "0.125",
            "shannon_entropy": 4,
            "correlation_dimension": null,
            "samples_collected": 40
        })),
    )
    .await;
    mount(
        server,
        "/api/dns",
        ResponseTemplate::new(200)
            .set_body_json(json!({"cache_size": 8, "cache_hits": 3, "cache_misses": 1})),
    )
    .await;
}

// ── Cycles ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_healthy_cycle_renders_every_section() {
    let (server, client) = setup().await;
    mount_healthy(&server).await;

    let report = run_cycle(&client, 1).await;
    assert!(report.is_ok(), "cycle failed: {:?}", report.result);

    let mut dash = Dashboard::new(RecordingPresenter::new());
    dash.init();
    assert_eq!(dash.apply(&report), Transition::BecameOnline);

    let p = dash.presenter();
    assert_eq!(p.text(TextSink::Status), Some("Connected"));
    assert_eq!(p.text(TextSink::HeaderSuccessRate), Some("95.0%"));
    assert_eq!(p.text(TextSink::HeaderTraffic), Some("2.00 KB"));
    assert_eq!(p.text(TextSink::Uptime), Some("1d 1h"));
    assert_eq!(p.text(TextSink::Lyapunov), Some("0.125"));
    assert_eq!(p.text(TextSink::Correlation), Some("0.000"));
    assert_eq!(p.text(TextSink::HitRate), Some("75.0%"));
    assert_eq!(p.text(TextSink::Http), Some("2"));
    assert_eq!(
        p.arc(ArcSink::Bypassed).unwrap().dasharray(),
        "0 377".to_string()
    );
    assert_eq!(dash.history().as_vec(), vec![2048]);
}

#[tokio::test]
async fn test_chaos_failure_flips_offline() {
    let (server, client) = setup().await;
    mount_healthy(&server).await;

    let mut dash = Dashboard::new(RecordingPresenter::new());
    dash.init();
    dash.apply(&run_cycle(&client, 1).await);
    assert!(dash.is_online());

    server.reset().await;
    mount_healthy_except_chaos(&server).await;

    let report = run_cycle(&client, 2).await;
    let err = report.result.clone().unwrap_err();
    assert_eq!(err.endpoint(), Endpoint::Chaos);
    assert!(matches!(err, CycleError::Transport { .. }));

    assert_eq!(dash.apply(&report), Transition::WentOffline);
    let p = dash.presenter();
    assert_eq!(dash.state(), ConnectivityState::Offline);
    assert_eq!(p.text(TextSink::HeaderSuccessRate), Some(PLACEHOLDER));
    assert_eq!(p.text(TextSink::Lyapunov), Some(PLACEHOLDER));
    assert_eq!(p.text(TextSink::HitRate), Some(PLACEHOLDER));
    assert!(dash.history().is_empty());
}

async fn mount_healthy_except_chaos(server: &MockServer) {
    mount(
        server,
        "/api/stats",
        ResponseTemplate::new(200).set_body_json(json!({"uptime": 1})),
    )
    .await;
    mount(
        server,
        "/api/chaos",
        ResponseTemplate::new(503).set_body_string("engine warming up"),
    )
    .await;
    mount(
        server,
        "/api/dns",
        ResponseTemplate::new(200).set_body_json(json!({})),
    )
    .await;
}

#[tokio::test]
async fn test_malformed_dns_is_parse_failure() {
    let (server, client) = setup().await;
    mount(
        &server,
        "/api/stats",
        ResponseTemplate::new(200).set_body_json(json!({})),
    )
    .await;
    mount(
        &server,
        "/api/chaos",
        ResponseTemplate::new(200).set_body_json(json!({})),
    )
    .await;
    mount(
        &server,
        "/api/dns",
        ResponseTemplate::new(200).set_body_string("not json"),
    )
    .await;

    let report = run_cycle(&client, 1).await;
    let err = report.result.unwrap_err();
    assert!(matches!(err, CycleError::Parse { endpoint: Endpoint::Dns, .. }));
}

#[tokio::test]
async fn test_poller_delivers_reports_until_cancelled() {
    let (server, client) = setup().await;
    mount_healthy(&server).await;

    let (tx, mut rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let handle = Poller::new(
        client,
        PollerConfig {
            interval: Duration::from_millis(50),
            overlap: OverlapPolicy::Skip,
        },
    )
    .spawn(tx, cancel.clone());

    let mut dash = Dashboard::new(RecordingPresenter::new());
    for expected in 1..=3 {
        let report = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(report.cycle, expected);
        dash.apply(&report);
    }
    assert_eq!(dash.history().len(), 3);
    assert_eq!(dash.presenter().pulses(), 1);

    cancel.cancel();
    handle.await.unwrap();
}
