//! Installs the global telemetry subscriber in a dedicated test binary.

use rstest::rstest;
use serv::telemetry;
use serv_config::{Config, LogFormat};

#[rstest]
fn the_first_installation_wins() {
    let first = telemetry::initialise(&Config::default()).expect("first installation");
    let compact = Config {
        log_format: LogFormat::Compact,
        log_filter: String::from("trace"),
        ..Config::default()
    };
    let second = telemetry::initialise(&compact).expect("repeat installation");

    assert_eq!(first, second);
    assert_eq!(second.format(), LogFormat::Json);
    assert!(first.filter().contains("serv::lifecycle"));
}
