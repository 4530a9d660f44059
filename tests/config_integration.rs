use memory_browser::config::AppConfig;
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;

const ARGS: [&str; 1] = ["memory-browser"];

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("MEMORY_BROWSER__SERVER__PORT");
        env::remove_var("MEMORY_BROWSER__API__BASE_URL");
        env::remove_var("MEMORY_BROWSER__LIMITS__RETRIEVE_MAX_RESULTS");
        env::remove_var("MEMORY_BROWSER__UI__OPEN_BROWSER");
        env::remove_var("CONFIG_FILE");
        env::remove_var("HOST");
        env::remove_var("PORT");
        env::remove_var("MEMORY_API_URL");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load defaults");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
    assert_eq!(config.limits.events_max_results, 50);
    assert_eq!(config.limits.records_max_results, 50);
    assert_eq!(config.limits.retrieve_max_results, 20);
    assert!(config.ui.open_browser);
    assert_eq!(config.ui.browser_delay_ms, 2000);
    assert!(!config.logging.json);
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("MEMORY_BROWSER__SERVER__PORT", "9090");
        env::set_var("MEMORY_BROWSER__LIMITS__RETRIEVE_MAX_RESULTS", "5");
        env::set_var("MEMORY_BROWSER__UI__OPEN_BROWSER", "false");
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.limits.retrieve_max_results, 5);
    assert!(!config.ui.open_browser);

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("MEMORY_BROWSER__SERVER__PORT", "9090");
    }

    let config = AppConfig::load_from_args([
        "memory-browser",
        "--port",
        "9191",
        "--api-url",
        "http://api.local:7000",
        "--no-browser",
        "--log-json",
    ])
    .expect("Failed to load config");
    assert_eq!(config.server.port, 9191);
    assert_eq!(config.api.base_url, "http://api.local:7000");
    assert!(!config.ui.open_browser);
    assert!(config.logging.json);

    clear_env_vars();
}

#[test]
#[serial]
fn test_plain_env_flags() {
    clear_env_vars();
    unsafe {
        env::set_var("PORT", "8181");
        env::set_var("MEMORY_API_URL", "http://from-env:8080");
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
    assert_eq!(config.server.port, 8181);
    assert_eq!(config.api.base_url, "http://from-env:8080");

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("Failed to create temp config");
    write!(
        file,
        r#"
server:
  port: 7070
api:
  base_url: "http://memory-api:9000"
limits:
  events_max_results: 10
"#
    )
    .expect("Failed to write temp config");

    // Point at the file through the env var clap reads for --config
    unsafe {
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = AppConfig::load_from_args(ARGS).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(config.api.base_url, "http://memory-api:9000");
    assert_eq!(config.limits.events_max_results, 10);
    assert_eq!(config.limits.records_max_results, 50);

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_file_is_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args(["memory-browser", "--config", "does-not-exist.yaml"]);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    let cwd_path = "config.yaml";
    fs::write(cwd_path, "server:\n  port: 6060\n").expect("Failed to write ./config.yaml");

    let result = std::panic::catch_unwind(|| {
        let config = AppConfig::load_from_args(ARGS).expect("Failed to load config");
        assert_eq!(config.server.port, 6060);
    });

    fs::remove_file(cwd_path).unwrap();

    if let Err(e) = result {
        std::panic::resume_unwind(e);
    }
}
