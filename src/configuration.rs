use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
    #[serde(default)]
    pub password: PasswordSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Token signing settings
///
/// The two keys are independent trust domains and must never be equal.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub access_token_key: String,
    pub refresh_token_key: String,
    pub access_token_age: i64, // seconds (e.g., 3000)
    pub issuer: String,
}

impl JwtSettings {
    pub fn validate(&self) -> Result<(), crate::error::ConfigError> {
        use crate::error::ConfigError as SettingsError;

        if self.access_token_key.is_empty() {
            return Err(SettingsError::MissingRequired("jwt.access_token_key".to_string()));
        }
        if self.refresh_token_key.is_empty() {
            return Err(SettingsError::MissingRequired("jwt.refresh_token_key".to_string()));
        }
        if self.access_token_key == self.refresh_token_key {
            return Err(SettingsError::InvalidValue(
                "jwt.access_token_key and jwt.refresh_token_key must differ".to_string(),
            ));
        }
        if self.access_token_age <= 0 {
            return Err(SettingsError::InvalidValue(
                "jwt.access_token_age must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct PasswordSettings {
    pub bcrypt_cost: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Load settings from `configuration.yaml` (optional), then `APP_*`
/// environment variables, e.g. `APP_JWT__REFRESH_TOKEN_KEY`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
