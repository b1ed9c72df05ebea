//! Integration test for file logging
//!
//! A global subscriber can only be installed once per process, so this binary
//! holds a single test.

use tempfile::TempDir;
use vsweep::config::LoggingConfig;
use vsweep::logging::init_logging;
use vsweep::logging::structured::LOG_FILE_PREFIX;

#[test]
fn test_json_log_file_carries_server_span() {
    // Events from this test binary are outside the default `vsweep` target
    std::env::set_var("RUST_LOG", "info");
    let temp = TempDir::new().unwrap();
    let config = LoggingConfig {
        local_enabled: true,
        local_path: temp.path().to_string_lossy().to_string(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("debug", &config).expect("Failed to initialize logging");
    {
        let span = tracing::info_span!("server", host = "vc01.example.com", mode = "chunked");
        let _entered = span.enter();
        tracing::info!(unit = "vInfo", "Unit exported");
    }
    // Second install must fail instead of panicking
    assert!(init_logging("info", &config).is_err());
    drop(guard);

    let contents = std::fs::read_to_string(temp.path().join(LOG_FILE_PREFIX)).unwrap();
    let line = contents
        .lines()
        .find(|l| l.contains("Unit exported"))
        .expect("log line written");
    let json: serde_json::Value = serde_json::from_str(line).unwrap();

    assert_eq!(json["fields"]["unit"], "vInfo");
    assert_eq!(json["span"]["host"], "vc01.example.com");
    assert_eq!(json["spans"][0]["name"], "server");
}
