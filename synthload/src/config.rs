use crate::logs;
use crate::schedule::JitterSchedule;
use crate::sentence;
use crate::storage;

/// What the loop does when an iteration fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    #[default]
    Halt,
    LogAndContinue,
}

impl ErrorPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "halt" | "fail" | "exit" => Some(ErrorPolicy::Halt),
            "continue" | "log" | "log-and-continue" => Some(ErrorPolicy::LogAndContinue),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub log_group_locator: String,
    pub key_id: String,
    pub storage_locator: String,
    pub stream_name: String,
    pub object_key: String,
    pub words_per_sentence: usize,
    pub schedule: JitterSchedule,
    pub on_error: ErrorPolicy,
    pub max_iterations: Option<u64>,
}

impl Config {
    pub fn new(
        log_group_locator: impl Into<String>,
        key_id: impl Into<String>,
        storage_locator: impl Into<String>,
    ) -> Self {
        Self {
            log_group_locator: log_group_locator.into(),
            key_id: key_id.into(),
            storage_locator: storage_locator.into(),
            stream_name: logs::stream_name(None, None),
            object_key: storage::DEFAULT_OBJECT_KEY.to_string(),
            words_per_sentence: sentence::DEFAULT_WORDS,
            schedule: JitterSchedule::default(),
            on_error: ErrorPolicy::default(),
            max_iterations: None,
        }
    }
    pub fn with_stream_name(mut self, name: impl Into<String>) -> Self {
        self.stream_name = name.into();
        self
    }
    pub fn with_pod(self, pod_ip: Option<&str>, pod_namespace: Option<&str>) -> Self {
        self.with_stream_name(logs::stream_name(pod_ip, pod_namespace))
    }
    pub fn with_object_key(mut self, key: impl Into<String>) -> Self {
        self.object_key = key.into();
        self
    }
    pub fn with_words_per_sentence(mut self, words: usize) -> Self {
        self.words_per_sentence = words;
        self
    }
    pub fn with_schedule(mut self, schedule: JitterSchedule) -> Self {
        self.schedule = schedule;
        self
    }
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = Some(n);
        self
    }
}
