use anyhow::{Context, Result, bail};
use storage::services::check_in::ScoringDefaults;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub scoring_defaults: ScoringDefaults,
    pub live_channel_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fallback = ScoringDefaults::default();

        Ok(Self {
            host: lookup("HOST").context("Cannot load HOST env variable")?,
            port: lookup("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: lookup("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: lookup("API_KEYS").unwrap_or_default(),
            scoring_defaults: ScoringDefaults {
                arrows_per_end: positive_or(&lookup, "DEFAULT_ARROWS_PER_END", fallback.arrows_per_end)?,
                ends_planned: positive_or(&lookup, "DEFAULT_ENDS_PLANNED", fallback.ends_planned)?,
                max_score: fallback.max_score,
                x_value: positive_or(&lookup, "DEFAULT_X_VALUE", fallback.x_value)?,
            },
            live_channel_capacity: parse_or(&lookup, "LIVE_CHANNEL_CAPACITY", 256)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        None => Ok(default),
    }
}

fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: i32) -> Result<i32> {
    let value = parse_or(lookup, key, default)?;
    if value <= 0 {
        bail!("{key} must be a positive number, got {value}");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("HOST", "0.0.0.0"),
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://league@localhost/league"),
    ];

    #[test]
    fn test_defaults_when_optional_vars_missing() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.api_keys, "");
        assert_eq!(config.scoring_defaults, ScoringDefaults::default());
        assert_eq!(config.live_channel_capacity, 256);
    }

    #[test]
    fn test_scoring_defaults_from_env() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DEFAULT_ARROWS_PER_END", "5"));
        pairs.push(("DEFAULT_X_VALUE", "11"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.scoring_defaults.arrows_per_end, 5);
        assert_eq!(config.scoring_defaults.x_value, 11);
        assert_eq!(config.scoring_defaults.max_score, 10);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let config = Config::from_lookup(lookup_from(&[("HOST", "h"), ("PORT", "1")]));
        assert!(config.is_err());
    }

    #[test]
    fn test_bad_port_fails() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "h"),
            ("PORT", "eighty"),
            ("DATABASE_URL", "postgres://x"),
        ]));
        assert!(config.is_err());
    }

    #[test]
    fn test_non_positive_scoring_defaults_fail() {
        for (key, raw) in [
            ("DEFAULT_ARROWS_PER_END", "0"),
            ("DEFAULT_ENDS_PLANNED", "-2"),
            ("DEFAULT_X_VALUE", "0"),
        ] {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, raw));

            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();

            assert!(err.to_string().contains(key), "{err}");
            assert!(err.to_string().contains("positive"), "{err}");
        }
    }
}
