use roast_config::load_toml;
use rstest::rstest;

#[test]
fn accepts_a_complete_config() {
    let toml = r#"
[port]
path = "/dev/cu.usbmodem301"
baud = 115200

[acquisition]
read_timeout_ms = 2000
poll_backoff_ms = 250
live_min_rounds = 10

[logging]
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config");
    assert_eq!(cfg.port.path, "/dev/cu.usbmodem301");
    assert_eq!(cfg.port.baud, 115_200);
    assert_eq!(cfg.acquisition.poll_backoff_ms, 250);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg = load_toml("").expect("parse empty TOML");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.port.baud, 115_200);
    assert_eq!(cfg.acquisition.read_timeout_ms, 2_000);
    assert_eq!(cfg.acquisition.live_min_rounds, 10);
    assert!(cfg.logging.file.is_none());
}

#[rstest]
#[case("[port]\nbaud = 0\n", "port.baud must be > 0")]
#[case("[port]\npath = \"\"\n", "port.path must not be empty")]
#[case(
    "[acquisition]\nread_timeout_ms = 0\n",
    "acquisition.read_timeout_ms must be >= 1"
)]
#[case(
    "[acquisition]\npoll_backoff_ms = 0\n",
    "acquisition.poll_backoff_ms must be >= 1"
)]
#[case(
    "[acquisition]\npoll_backoff_ms = 100000\n",
    "poll_backoff_ms is unreasonably large"
)]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
fn rejects_out_of_range_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").contains(needle),
        "error {err} missing {needle:?}"
    );
}
