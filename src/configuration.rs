use config::{Config, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub storage: StorageSettings,
    pub icon_search: IconSearchSettings,
    pub avatar: AvatarSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(serde::Deserialize)]
pub struct ApplicationSettings {
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(serde::Deserialize)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: SecretString,
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    pub database_name: String,
    pub require_ssl: bool,
}

/// Object-storage bucket used for uploaded card images. `base_url` points at
/// the storage REST root (e.g. `https://<project>.supabase.co/storage/v1`).
#[derive(serde::Deserialize)]
pub struct StorageSettings {
    pub base_url: String,
    pub bucket: String,
    pub service_key: SecretString,
}

/// Upstream icon-search credentials. `enabled = false` switches the resolver
/// to avatar-only mode: no upstream query is ever made for the no-file path.
#[derive(serde::Deserialize)]
pub struct IconSearchSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub consumer_key: String,
    pub consumer_secret: SecretString,
}

/// Generated-avatar service and the theme's background/foreground pair.
/// `background` may be a hex value or the literal "random".
#[derive(serde::Deserialize)]
pub struct AvatarSettings {
    pub base_url: String,
    pub background: String,
    pub color: String,
}

#[derive(serde::Deserialize)]
pub struct TelemetrySettings {
    pub otlp_endpoint: String,
}

impl DatabaseSettings {
    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.database_name)
            .log_statements(tracing_log::log::LevelFilter::Trace)
    }

    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn to_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configurations");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");
    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base")))
        .add_source(File::from(
            configuration_directory.join(environment.to_str()),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"), // Use double underscore to represent nested struct fields (e.g., APP_DATABASE__USERNAME)
        );

    settings.build()?.try_deserialize()
}
