use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use url::Url;

pub const DEFAULT_API_ENDPOINT: &str = "https://ark.cn-beijing.volces.com/api/v3/responses";
pub const DEFAULT_MODEL_ID: &str = "doubao-seed-translation-250915";
pub const DEFAULT_TARGET_LANG: &str = "en";
pub const AUTO_SOURCE_LANG: &str = "auto";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const ENV_TRANSLATION_API_KEY: &str = "TRANSLATION_API_KEY";
pub const ENV_MODEL_ID: &str = "MODEL_ID";
pub const ENV_TRANSLATION_API_ENDPOINT: &str = "TRANSLATION_API_ENDPOINT";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceLang {
    #[default]
    Auto,
    Code(String),
}

impl SourceLang {
    /// Blank input and the `auto` sentinel both mean "let the provider detect".
    pub fn parse(value: &str) -> Self {
        let v = value.trim();
        if v.is_empty() || v == AUTO_SOURCE_LANG {
            Self::Auto
        } else {
            Self::Code(v.to_owned())
        }
    }

    /// The explicit hint to send upstream, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Auto => None,
            Self::Code(code) => Some(code),
        }
    }

    pub fn as_str(&self) -> &str {
        self.hint().unwrap_or(AUTO_SOURCE_LANG)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetLang(String);

impl TargetLang {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into().trim().to_owned();
        if v.is_empty() {
            return Err(ConfigError::EmptyTargetLang);
        }
        if v == AUTO_SOURCE_LANG {
            return Err(ConfigError::AutoNotAllowed);
        }
        Ok(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TargetLang {
    fn default() -> Self {
        Self(DEFAULT_TARGET_LANG.to_owned())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: SourceLang,
    pub target: TargetLang,
}

impl LanguagePair {
    /// Exchanges source and target. A detected source has no language to
    /// become the target, so swapping it is refused.
    pub fn swap(&self) -> Result<Self, ConfigError> {
        match &self.source {
            SourceLang::Auto => Err(ConfigError::AutoNotAllowed),
            SourceLang::Code(code) => Ok(Self {
                source: SourceLang::Code(self.target.as_str().to_owned()),
                target: TargetLang::new(code.clone())?,
            }),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: Url,
    pub model: String,
    pub api_key: ApiKey,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(
        endpoint: &str,
        model: String,
        api_key: ApiKey,
        timeout_ms: u64,
    ) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            endpoint: Url::parse(endpoint)?,
            model,
            api_key,
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Builds the provider settings from flags, the environment and defaults,
    /// in that order of precedence. Only the api key has no default.
    pub fn resolve(
        api_key: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        timeout_ms: u64,
        env: &impl Env,
    ) -> Result<Self, ConfigError> {
        let api_key = resolve_api_key(api_key, ENV_TRANSLATION_API_KEY, env)?
            .ok_or(ConfigError::MissingApiKey)?;
        let model = resolve_string_with_default(model, ENV_MODEL_ID, env, DEFAULT_MODEL_ID);
        let endpoint = resolve_string_with_default(
            endpoint,
            ENV_TRANSLATION_API_ENDPOINT,
            env,
            DEFAULT_API_ENDPOINT,
        );
        Self::new(&endpoint, model, api_key, timeout_ms)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target language must not be empty")]
    EmptyTargetLang,
    #[error("automatic detection cannot be used as the target language")]
    AutoNotAllowed,
    #[error("api key must not be empty")]
    EmptyApiKey,
    #[error("TRANSLATION_API_KEY is not configured")]
    MissingApiKey,
    #[error("timeout must be > 0 ms")]
    ZeroTimeout,
    #[error("invalid endpoint url: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiKey::new(v)?)),
        None => match env.var(env_key) {
            Some(v) => Ok(Some(ApiKey::new(v)?)),
            None => Ok(None),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_TRANSLATION_API_KEY, "env-key");
        let key = resolve_api_key(Some("cli-key".to_owned()), ENV_TRANSLATION_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "cli-key");
    }

    #[test]
    fn api_key_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_TRANSLATION_API_KEY, "env-key");
        let key = resolve_api_key(None, ENV_TRANSLATION_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "env-key");
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret").expect("non-empty");
        assert_eq!(format!("{key:?}"), "ApiKey(**redacted**)");
        assert_eq!(ApiKey::new("  "), Err(ConfigError::EmptyApiKey));
    }

    #[test]
    fn resolve_string_with_default_precedence() {
        let env = MapEnv::default().with_var(ENV_MODEL_ID, "env");
        assert_eq!(
            resolve_string_with_default(Some("cli".to_owned()), ENV_MODEL_ID, &env, "def"),
            "cli"
        );
        assert_eq!(resolve_string_with_default(None, ENV_MODEL_ID, &env, "def"), "env");
        assert_eq!(
            resolve_string_with_default(None, ENV_MODEL_ID, &MapEnv::default(), "def"),
            "def"
        );
    }

    #[test]
    fn provider_config_uses_defaults() {
        let env = MapEnv::default().with_var(ENV_TRANSLATION_API_KEY, "k");
        let cfg = ProviderConfig::resolve(None, None, None, DEFAULT_TIMEOUT_MS, &env)
            .expect("valid config");
        assert_eq!(cfg.endpoint.as_str(), DEFAULT_API_ENDPOINT);
        assert_eq!(cfg.model, DEFAULT_MODEL_ID);
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn provider_config_requires_key_and_valid_settings() {
        let env = MapEnv::default();
        assert_eq!(
            ProviderConfig::resolve(None, None, None, 1000, &env),
            Err(ConfigError::MissingApiKey)
        );
        let key = ApiKey::new("k").expect("non-empty");
        assert_eq!(
            ProviderConfig::new(DEFAULT_API_ENDPOINT, "m".into(), key.clone(), 0),
            Err(ConfigError::ZeroTimeout)
        );
        assert!(matches!(
            ProviderConfig::new("not a url", "m".into(), key, 1000),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn source_lang_parses_auto_sentinel() {
        assert_eq!(SourceLang::parse("auto"), SourceLang::Auto);
        assert_eq!(SourceLang::parse(" "), SourceLang::Auto);
        assert_eq!(SourceLang::parse(" zh "), SourceLang::Code("zh".into()));
        assert_eq!(SourceLang::Auto.hint(), None);
        assert_eq!(SourceLang::Auto.as_str(), "auto");
    }

    #[test]
    fn target_lang_rejects_empty_and_auto() {
        assert_eq!(TargetLang::new(""), Err(ConfigError::EmptyTargetLang));
        assert_eq!(TargetLang::new("auto"), Err(ConfigError::AutoNotAllowed));
        assert_eq!(TargetLang::default().as_str(), "en");
    }

    #[test]
    fn swap_exchanges_explicit_languages() {
        let pair = LanguagePair {
            source: SourceLang::Code("zh".into()),
            target: TargetLang::new("ja").expect("valid"),
        };
        let swapped = pair.swap().expect("swappable");
        assert_eq!(swapped.source, SourceLang::Code("ja".into()));
        assert_eq!(swapped.target.as_str(), "zh");
    }

    #[test]
    fn swap_refuses_detected_source() {
        let pair = LanguagePair::default();
        assert_eq!(pair.swap(), Err(ConfigError::AutoNotAllowed));
    }
}
