//! Configuration loading tests

use std::io::Write;

use farmrag::AppConfig;

#[test]
fn test_from_file_parses_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
            [logging]
            level = "warn"
            backtrace = false

            [knowledge_base]
            endpoint = "http://kb.internal:8000"
            top_k = 7

            [llm]
            llm_endpoint = "http://llm.internal:11434"
            llm_key = "sk-live"
            llm_model = "gpt-4"

            [classifier]
            disease_endpoint = "http://cls.internal/disease"
            produce_endpoint = "http://cls.internal/produce"

            [audio]
            endpoint = "http://audio.internal/transcribe"
            model = "whisper-large"
        "#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.knowledge_base_endpoint(), "http://kb.internal:8000");
    assert_eq!(config.top_k(), 7);
    // Omitted timeout falls back to the default
    assert_eq!(config.timeout_secs(), 30);
    assert_eq!(config.llm_model(), "gpt-4");
    assert_eq!(config.audio.model, "whisper-large");
    assert!(config.chat_enabled());
}

#[test]
fn test_from_file_rejects_invalid_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not valid toml [").unwrap();

    assert!(AppConfig::from_file(file.path()).is_err());
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(AppConfig::from_file("/nonexistent/config.toml").is_err());
}
