use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use synthload::builders::{self, AwsOptions, Backend, KmsChoice};
use synthload::logging;
use synthload::schedule::JitterSchedule;
use synthload::{Config, Error, ErrorPolicy, Generator};

// Every recognised variable, primary name first, then legacy aliases.
const VARIABLES: &[(&str, &[&str])] = &[
    ("LOG_GROUP_LOCATOR", &["AWS_LOG_GROUP_ARN"]),
    ("KEY_ID", &["AWS_KMS_ARN"]),
    ("STORAGE_LOCATOR", &["STORAGE_ARN"]),
    ("POD_NAMESPACE", &["MY_POD_NAMESPACE"]),
    ("POD_IP", &["MY_POD_IP"]),
    ("MIN_SLEEP_SECS", &[]),
    ("MAX_SLEEP_SECS", &[]),
    ("ON_ERROR", &[]),
    ("MAX_ITERATIONS", &[]),
    ("BACKEND", &[]),
    ("KMS", &[]),
    ("STATIC_MASTER_KEY_HEX", &[]),
    ("AWS_REGION", &[]),
    ("AWS_ENDPOINT_URL", &[]),
    ("OBJECT_KEY", &[]),
    ("WORDS_PER_SENTENCE", &[]),
    ("LOG_LEVEL", &[]),
];

/// Raw options as they arrive from the environment or a JSON document.
/// Values stay strings until `apply` so both sources validate the same way.
/// Legacy names are folded into the primary ones by `from_lookup`.
#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigOptions {
    #[serde(rename = "LOG_GROUP_LOCATOR")]
    pub log_group_locator: Option<String>,
    #[serde(rename = "KEY_ID")]
    pub key_id: Option<String>,
    #[serde(rename = "STORAGE_LOCATOR")]
    pub storage_locator: Option<String>,
    #[serde(rename = "POD_NAMESPACE")]
    pub pod_namespace: Option<String>,
    #[serde(rename = "POD_IP")]
    pub pod_ip: Option<String>,
    #[serde(rename = "MIN_SLEEP_SECS")]
    pub min_sleep_secs: Option<String>,
    #[serde(rename = "MAX_SLEEP_SECS")]
    pub max_sleep_secs: Option<String>,
    #[serde(rename = "ON_ERROR")]
    pub on_error: Option<String>,
    #[serde(rename = "MAX_ITERATIONS")]
    pub max_iterations: Option<String>,
    #[serde(rename = "BACKEND")]
    pub backend: Option<String>,
    #[serde(rename = "KMS")]
    pub kms: Option<String>,
    #[serde(rename = "STATIC_MASTER_KEY_HEX")]
    pub static_master_key_hex: Option<String>,
    #[serde(rename = "AWS_REGION")]
    pub aws_region: Option<String>,
    #[serde(rename = "AWS_ENDPOINT_URL")]
    pub aws_endpoint_url: Option<String>,
    #[serde(rename = "OBJECT_KEY")]
    pub object_key: Option<String>,
    #[serde(rename = "WORDS_PER_SENTENCE")]
    pub words_per_sentence: Option<String>,
    #[serde(rename = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Validated options, ready to build services from.
#[derive(Clone, Debug)]
pub struct AppliedConfig {
    pub config: Config,
    pub backend: Backend,
    pub kms: KmsChoice,
    pub aws: AwsOptions,
    pub log_level: log::LevelFilter,
}

impl ConfigOptions {
    /// Reads a flat JSON object keyed by variable name. Scalars are taken
    /// as their string form, so `"MAX_ITERATIONS": 3` and `"3"` are equal.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json).context("invalid config JSON")?;
        if let Some((name, _)) = doc.iter().find(|(_, v)| v.is_array() || v.is_object()) {
            return Err(anyhow!("config value for {name} must be a string, number or bool"));
        }
        Self::from_lookup(|name| match doc.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads every known variable through `lookup`. A primary name wins over
    /// its legacy aliases; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut map = serde_json::Map::new();
        for (primary, aliases) in VARIABLES {
            let found = std::iter::once(*primary)
                .chain(aliases.iter().copied())
                .find_map(|name| lookup(name).filter(|v| !v.is_empty()));
            if let Some(value) = found {
                map.insert((*primary).to_string(), serde_json::Value::String(value));
            }
        }
        let cfg = serde_json::from_value(serde_json::Value::Object(map))
            .context("invalid config values")?;
        Ok(cfg)
    }

    /// Checks every option and produces the generator configuration.
    /// All missing required variables are reported together.
    pub fn apply(&self) -> Result<AppliedConfig, Error> {
        let required = [
            ("LOG_GROUP_LOCATOR", "AWS_LOG_GROUP_ARN", &self.log_group_locator),
            ("KEY_ID", "AWS_KMS_ARN", &self.key_id),
            ("STORAGE_LOCATOR", "STORAGE_ARN", &self.storage_locator),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, _, value)| non_empty(value).is_none())
            .map(|(name, alias, _)| format!("{name} (or {alias})"))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing required variables: {}",
                missing.join(", ")
            )));
        }
        let log_group_locator = required_value(&self.log_group_locator);
        let key_id = required_value(&self.key_id);
        let storage_locator = required_value(&self.storage_locator);

        let min = parse_number::<u64>("MIN_SLEEP_SECS", &self.min_sleep_secs)?
            .map(Duration::from_secs)
            .unwrap_or(synthload::schedule::DEFAULT_MIN_SLEEP);
        let max = parse_number::<u64>("MAX_SLEEP_SECS", &self.max_sleep_secs)?
            .map(Duration::from_secs)
            .unwrap_or(synthload::schedule::DEFAULT_MAX_SLEEP);
        let schedule =
            JitterSchedule::new(min, max).map_err(|e| Error::Configuration(e.to_string()))?;

        let on_error = parse_choice("ON_ERROR", &self.on_error, ErrorPolicy::parse)?
            .unwrap_or_default();
        let backend = parse_choice("BACKEND", &self.backend, Backend::parse)?.unwrap_or_default();
        let master_key_hex = non_empty(&self.static_master_key_hex).map(str::to_string);
        let kms = match non_empty(&self.kms) {
            Some(raw) => KmsChoice::parse(raw, master_key_hex)
                .ok_or_else(|| invalid("KMS", raw))?,
            None => match backend {
                Backend::Aws => KmsChoice::Aws,
                Backend::Memory => KmsChoice::Static { master_key_hex },
            },
        };
        let log_level = parse_choice("LOG_LEVEL", &self.log_level, logging::parse_level)?
            .unwrap_or(log::LevelFilter::Info);

        let mut config = Config::new(log_group_locator, key_id, storage_locator)
            .with_pod(non_empty(&self.pod_ip), non_empty(&self.pod_namespace))
            .with_schedule(schedule)
            .with_error_policy(on_error);
        if let Some(key) = non_empty(&self.object_key) {
            config = config.with_object_key(key);
        }
        let words = parse_number::<usize>("WORDS_PER_SENTENCE", &self.words_per_sentence)?;
        if let Some(words) = words {
            if words == 0 {
                return Err(invalid("WORDS_PER_SENTENCE", "0"));
            }
            config = config.with_words_per_sentence(words);
        }
        if let Some(n) = parse_number::<u64>("MAX_ITERATIONS", &self.max_iterations)? {
            config = config.with_max_iterations(n);
        }

        Ok(AppliedConfig {
            config,
            backend,
            kms,
            aws: AwsOptions {
                region: non_empty(&self.aws_region).map(str::to_string),
                endpoint_url: non_empty(&self.aws_endpoint_url).map(str::to_string),
            },
            log_level,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required_value(value: &Option<String>) -> String {
    non_empty(value).unwrap_or_default().to_string()
}

fn invalid(name: &str, raw: &str) -> Error {
    Error::Configuration(format!("invalid value for {name}: {raw:?}"))
}

fn parse_number<T: std::str::FromStr>(
    name: &str,
    value: &Option<String>,
) -> Result<Option<T>, Error> {
    match non_empty(value) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| invalid(name, raw)),
        None => Ok(None),
    }
}

fn parse_choice<T>(
    name: &str,
    value: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, Error> {
    match non_empty(value) {
        Some(raw) => parse(raw).map(Some).ok_or_else(|| invalid(name, raw)),
        None => Ok(None),
    }
}

/// Validates `options`, builds the services they select and wires them into
/// a generator. `rt` is shared with the AWS adapters when given.
pub fn generator_from_config(
    options: &ConfigOptions,
    rt: Option<Arc<tokio::runtime::Runtime>>,
) -> Result<(Generator, AppliedConfig), Error> {
    let applied = options.apply()?;
    let services = builders::build_services(applied.backend, &applied.kms, &applied.aws, rt)
        .map_err(|e| Error::Configuration(format!("{e:#}")))?;
    let generator = Generator::new(applied.config.clone(), services);
    Ok((generator, applied))
}
