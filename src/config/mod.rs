//! 환경 변수 설정
use chrono::Duration;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "insecure-development-secret";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// 없으면 메모리 저장소로 실행
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// 0 이면 만료 스케줄러 비활성화
    pub expiry_sweep_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            database_max_connections: parse(&non_empty, "DATABASE_MAX_CONNECTIONS", 5)?,
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            jwt_secret: non_empty("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            access_token_ttl: Duration::seconds(parse(&non_empty, "ACCESS_TOKEN_TTL_SECS", 300)?),
            refresh_token_ttl: Duration::seconds(parse(
                &non_empty,
                "REFRESH_TOKEN_TTL_SECS",
                86_400,
            )?),
            expiry_sweep_secs: parse(&non_empty, "EXPIRY_SWEEP_SECS", 60)?,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.access_token_ttl, Duration::seconds(300));
        assert_eq!(config.expiry_sweep_secs, 60);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn values_are_read_and_validated() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("EXPIRY_SWEEP_SECS", "0"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/market"));
        assert_eq!(config.expiry_sweep_secs, 0);
        assert!(!config.uses_dev_secret());

        assert!(matches!(
            self::config(&[("DATABASE_MAX_CONNECTIONS", "many")]),
            Err(ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
