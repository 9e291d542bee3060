use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use platform_storage::StorageSettings;
use products_hr::source::DEFAULT_PAGE_SIZE;
use reqwest::Url;

const DEFAULT_API_BASE_URL: &str = "https://dummyjson.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub request_timeout: Duration,
    pub enrichment_seed: Option<u64>,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_base_url = var("HR_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        Url::parse(&api_base_url)
            .with_context(|| format!("invalid HR_API_BASE_URL `{api_base_url}`"))?;

        let page_size = match var("HR_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| anyhow!("HR_PAGE_SIZE must be a positive integer, got `{raw}`"))?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match var("HR_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid HR_REQUEST_TIMEOUT_SECS `{raw}`"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let enrichment_seed = var("HR_ENRICHMENT_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("invalid HR_ENRICHMENT_SEED `{raw}`"))
            })
            .transpose()?;

        Ok(Self {
            api_base_url,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
            enrichment_seed,
            storage: StorageSettings::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.page_size, 20);
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.enrichment_seed, None);
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = config(&[
            ("HR_API_BASE_URL", "http://127.0.0.1:8080/api"),
            ("HR_PAGE_SIZE", "5"),
            ("HR_REQUEST_TIMEOUT_SECS", "2"),
            ("HR_ENRICHMENT_SEED", " 42 "),
        ])
        .unwrap();
        assert_eq!(cfg.page_size, 5);
        assert_eq!(cfg.request_timeout, Duration::from_secs(2));
        assert_eq!(cfg.enrichment_seed, Some(42));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("HR_PAGE_SIZE", "0")]).is_err());
        assert!(config(&[("HR_API_BASE_URL", "not a url")]).is_err());
        assert!(config(&[("HR_ENRICHMENT_SEED", "abc")]).is_err());
    }
}
