use super::run::RunConfig;
use super::Validatable;
use crate::error::HammerError;
use async_trait::async_trait;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::PathBuf;
use tracing::info;

pub const ENV_PREFIX: &str = "HAMMER_";

#[async_trait]
pub trait ConfigProvider {
    async fn load_config(&self) -> Result<RunConfig, HammerError>;
}

/// Reads a `.toml` or `.json` settings file, then applies `HAMMER_*`
/// environment overrides (e.g. `HAMMER_INSERT_THREADS=8`).
#[derive(Debug)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load_config(&self) -> Result<RunConfig, HammerError> {
        info!("Loading settings from path: '{}'...", self.path.display());

        if !self.path.is_file() {
            return Err(HammerError::CannotLoadConfiguration(format!(
                "Cannot find settings file at path: '{}'.",
                self.path.display(),
            )));
        }

        let config_builder = Figment::new();
        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let config_builder = match extension {
            "json" => config_builder.merge(Json::file(&self.path)),
            "toml" => config_builder.merge(Toml::file(&self.path)),
            e => {
                return Err(HammerError::CannotLoadConfiguration(format!(
                    "Invalid file extension: '{e}', only .json and .toml are supported."
                )));
            }
        };

        let config_result: Result<RunConfig, figment::Error> = config_builder
            .merge(Env::prefixed(ENV_PREFIX))
            .extract();

        match config_result {
            Ok(config) => {
                config.validate()?;
                info!("Settings loaded from path: '{}'", self.path.display());
                info!("Using settings: {}", config);
                Ok(config)
            }
            Err(figment_error) => Err(HammerError::CannotLoadConfiguration(format!(
                "Failed to load settings: {figment_error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn settings_file(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    #[serial]
    async fn toml_settings_should_be_merged_over_defaults() {
        let file = settings_file(
            "toml",
            r#"
            inserts = 5000
            insert_threads = 4
            use_transaction_for_insert_batch = true
            insert_operation = "dbo.InsertOrder"
            select_operation = "dbo.FindOrders"
            "#,
        );

        let config = FileConfigProvider::new(file.path())
            .load_config()
            .await
            .unwrap();

        assert_eq!(config.inserts, 5000);
        assert_eq!(config.insert_threads, 4);
        assert!(config.use_transaction_for_insert_batch);
        assert_eq!(config.insert_batch_size, 10);
        assert_eq!(config.query_timeout_secs, 30);
    }

    #[tokio::test]
    #[serial]
    async fn json_settings_should_be_supported() {
        let file = settings_file(
            "json",
            r#"{ "inserts": 20, "select_threads": 0, "insert_operation": "insert" }"#,
        );

        let config = FileConfigProvider::new(file.path())
            .load_config()
            .await
            .unwrap();

        assert_eq!(config.inserts, 20);
        assert_eq!(config.select_threads, 0);
    }

    #[tokio::test]
    #[serial]
    async fn environment_should_override_file_values() {
        let file = settings_file(
            "toml",
            "insert_threads = 2\ninsert_operation = \"insert\"\nselect_operation = \"select\"\n",
        );
        std::env::set_var("HAMMER_INSERT_THREADS", "16");

        let config = FileConfigProvider::new(file.path()).load_config().await;
        std::env::remove_var("HAMMER_INSERT_THREADS");

        assert_eq!(config.unwrap().insert_threads, 16);
    }

    #[tokio::test]
    #[serial]
    async fn invalid_settings_should_fail_validation() {
        let file = settings_file("toml", "inserts = 0\ninsert_operation = \"insert\"\n");

        let result = FileConfigProvider::new(file.path()).load_config().await;

        assert!(matches!(result, Err(HammerError::InvalidConfiguration(_))));
    }

    #[tokio::test]
    #[serial]
    async fn unsupported_extension_should_be_rejected() {
        let file = settings_file("yaml", "inserts: 10\n");

        let result = FileConfigProvider::new(file.path()).load_config().await;

        assert!(matches!(
            result,
            Err(HammerError::CannotLoadConfiguration(_))
        ));
    }

    #[tokio::test]
    #[serial]
    async fn missing_file_should_be_reported() {
        let result = FileConfigProvider::new("/definitely/not/here.toml")
            .load_config()
            .await;

        assert!(matches!(
            result,
            Err(HammerError::CannotLoadConfiguration(_))
        ));
    }
}
