use dermascan_app::telemetry::{LogFormat, init};

#[test]
fn subscriber_installs_once() {
    init(LogFormat::Json).expect("first install");
    assert!(init(LogFormat::Plain).is_err());
    tracing::info!(component = "telemetry-test", "subscriber ready");
}
