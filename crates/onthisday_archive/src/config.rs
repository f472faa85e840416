use std::path::PathBuf;

use crate::ArchiveError;
use secrecy::SecretString;

pub const DEFAULT_ISSUER: &str = "OnThisDay.Api";
pub const DEFAULT_AUDIENCE: &str = "OnThisDay.Admin";
pub const DEFAULT_EXPIRY_MINUTES: u64 = 720;
/// Signing key used when `ONTHISDAY_JWT_KEY` is unset. Development only.
pub const DEVELOPMENT_JWT_KEY: &str = "onthisday-development-signing-key-change-me";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub key: SecretString,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: u64,
    /// True when `key` is [`DEVELOPMENT_JWT_KEY`].
    pub using_development_key: bool,
}

/// The single administrator account. The password is stored as a hex
/// HMAC-SHA256 digest keyed by `password_salt`.
#[derive(Clone, Debug)]
pub struct AdminAccount {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_salt: SecretString,
    pub password_hash: SecretString,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt: JwtConfig,
    pub admin: AdminAccount,
    pub seed_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ArchiveError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `get`, so tests
    /// never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ArchiveError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut get = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        let salt = get("ONTHISDAY_ADMIN_PASSWORD_SALT").ok_or_else(|| {
            ArchiveError::Config("ONTHISDAY_ADMIN_PASSWORD_SALT missing".into())
        })?;
        let hash = get("ONTHISDAY_ADMIN_PASSWORD_HASH").ok_or_else(|| {
            ArchiveError::Config("ONTHISDAY_ADMIN_PASSWORD_HASH missing".into())
        })?;

        let expiry_minutes = match get("ONTHISDAY_JWT_EXPIRY_MINUTES") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|m| *m > 0).ok_or_else(|| {
                ArchiveError::Config(format!(
                    "ONTHISDAY_JWT_EXPIRY_MINUTES must be a positive integer, got {raw:?}"
                ))
            })?,
            None => DEFAULT_EXPIRY_MINUTES,
        };

        let key = get("ONTHISDAY_JWT_KEY");
        let using_development_key = key.is_none();
        let jwt = JwtConfig {
            key: SecretString::new(key.unwrap_or_else(|| DEVELOPMENT_JWT_KEY.into()).into()),
            issuer: get("ONTHISDAY_JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.into()),
            audience: get("ONTHISDAY_JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.into()),
            expiry_minutes,
            using_development_key,
        };

        let admin = AdminAccount {
            id: 1,
            username: get("ONTHISDAY_ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            email: get("ONTHISDAY_ADMIN_EMAIL")
                .unwrap_or_else(|| "admin@onthisday.local".into()),
            password_salt: SecretString::new(salt.into()),
            password_hash: SecretString::new(hash.trim().to_ascii_lowercase().into()),
            is_active: true,
        };

        Ok(Self {
            jwt,
            admin,
            seed_file: get("ONTHISDAY_SEED_FILE").map(PathBuf::from),
        })
    }
}
