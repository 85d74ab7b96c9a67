//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed env var and cwd manipulation.

use desk_config::{ConfigError, DeskConfig, OracleKind};
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_oracle_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[oracle]
kind = "command"
program = "python3"
args = ["verify.py"]
timeout_ms = 1500
"#,
        )?;

        let config: DeskConfig = Figment::from(Serialized::defaults(DeskConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.oracle.kind, OracleKind::Command);
        assert_eq!(config.oracle.program, "python3");
        assert_eq!(config.oracle.args, vec!["verify.py".to_string()]);
        assert_eq!(config.oracle.timeout_ms, 1500);
        assert!(config.oracle.is_configured());
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_figment() {
    Jail::expect_with(|jail| {
        jail.create_dir(".examdesk")?;
        jail.create_file(
            ".examdesk/config.toml",
            r#"
[database]
path = "desk.db"

[intake]
max_photo_bytes = 1024
allowed_content_types = ["image/png"]

[violations]
queue_dir = ""
retry_attempts = 5
"#,
        )?;

        let config = DeskConfig::load().expect("config loads");
        assert_eq!(config.database.path, "desk.db");
        assert_eq!(config.intake.max_photo_bytes, 1024);
        assert!(!config.intake.allows_content_type("image/jpeg"));
        assert!(config.violations.queue_path().is_none());
        assert_eq!(config.violations.retry_attempts, 5);
        Ok(())
    });
}

#[test]
fn load_rejects_http_oracle_without_endpoint() {
    Jail::expect_with(|jail| {
        jail.create_dir(".examdesk")?;
        jail.create_file(
            ".examdesk/config.toml",
            r#"
[oracle]
kind = "http"
"#,
        )?;

        let err = DeskConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "oracle.endpoint"));
        Ok(())
    });
}

#[test]
fn unknown_oracle_kind_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_dir(".examdesk")?;
        jail.create_file(
            ".examdesk/config.toml",
            r#"
[oracle]
kind = "telepathy"
"#,
        )?;

        assert!(matches!(DeskConfig::load(), Err(ConfigError::Figment(_))));
        Ok(())
    });
}
