//! Integration tests for logging configuration and privacy helpers

use bridge_traits::log::LogLevel;
use core_runtime::logging::{redact_if_sensitive, strip_path, LogFormat, LoggingConfig};

#[test]
fn test_config_defaults() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, LogLevel::Info);
    assert!(config.redact_pii);
    assert!(config.filter.is_none());
    assert!(config.logger_sink.is_none());
    assert!(config.display_target);
    assert!(!config.display_thread_info);
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn test_config_chaining() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_pii_redaction(false)
        .with_filter("core_documents=debug,bridge_desktop=trace")
        .with_target(false)
        .with_thread_info(true);

    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.level, LogLevel::Warn);
    assert!(!config.redact_pii);
    assert_eq!(
        config.filter.as_deref(),
        Some("core_documents=debug,bridge_desktop=trace")
    );
    assert!(!config.display_target);
    assert!(config.display_thread_info);
}

#[test]
fn test_shared_file_paths_are_reduced_to_names() {
    assert_eq!(
        strip_path("/data/user/0/com.dmch.winetastingnotesapp/files/notes.json"),
        "notes.json"
    );
    assert_eq!(strip_path("C:\\Users\\me\\export\\notes.json"), "notes.json");
    assert_eq!(strip_path("notes.json"), "notes.json");
    assert_eq!(strip_path("/data/files/"), "");
}

#[test]
fn test_secrets_are_redacted() {
    assert_eq!(redact_if_sensitive("access_token", "abc"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("Authorization", "Bearer abc"), "[REDACTED]");

    let email = redact_if_sensitive("recipient", "someone@example.com");
    assert!(email.starts_with('s'));
    assert!(!email.contains("example.com"));
}

#[test]
fn test_uris_and_codes_pass_through() {
    assert_eq!(
        redact_if_sensitive("uri", "content://com.android.externalstorage.documents/tree/primary%3ADocs"),
        "content://com.android.externalstorage.documents/tree/primary%3ADocs"
    );
    assert_eq!(redact_if_sensitive("code", "E_PICKER_CANCELLED"), "E_PICKER_CANCELLED");
}
