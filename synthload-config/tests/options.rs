use std::collections::HashMap;
use std::time::Duration;

use synthload::builders::{Backend, KmsChoice};
use synthload::{Error, ErrorPolicy};
use synthload_config::{generator_from_config, ConfigOptions};

fn lookup(pairs: &[(&str, &str)]) -> ConfigOptions {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigOptions::from_lookup(|name| env.get(name).cloned()).expect("lookup should parse")
}

const REQUIRED: &[(&str, &str)] = &[
    (
        "LOG_GROUP_LOCATOR",
        "arn:aws:logs:us-east-1:123456789012:log-group:load:*",
    ),
    ("KEY_ID", "alias/load"),
    ("STORAGE_LOCATOR", "arn:aws:s3:::load-bucket"),
];

const KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut all = REQUIRED.to_vec();
    all.extend_from_slice(extra);
    all
}

#[test]
fn missing_required_lists_every_name() {
    let opts = lookup(&[("KEY_ID", "k")]);
    let err = opts.apply().unwrap_err();
    let Error::Configuration(msg) = &err else {
        panic!("expected configuration error, got {err:?}");
    };
    assert!(msg.contains("LOG_GROUP_LOCATOR"), "{msg}");
    assert!(msg.contains("STORAGE_LOCATOR"), "{msg}");
    assert!(!msg.contains("KEY_ID"), "{msg}");
}

#[test]
fn missing_required_fails_before_services_are_built() {
    // BACKEND=aws would need a runtime and credentials if it got that far
    let opts = lookup(&[("BACKEND", "aws")]);
    let err = generator_from_config(&opts, None).err().expect("should fail");
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(err.stage(), "configuration");
}

#[test]
fn empty_values_count_as_missing() {
    let opts = lookup(&[
        ("LOG_GROUP_LOCATOR", ""),
        ("KEY_ID", "k"),
        ("STORAGE_LOCATOR", "arn:aws:s3:::b"),
    ]);
    assert!(matches!(opts.apply(), Err(Error::Configuration(_))));
}

#[test]
fn legacy_names_are_accepted() {
    let opts = lookup(&[
        (
            "AWS_LOG_GROUP_ARN",
            "arn:aws:logs:us-east-1:1:log-group:legacy:*",
        ),
        ("AWS_KMS_ARN", "arn:aws:kms:us-east-1:1:key/abc"),
        ("STORAGE_ARN", "arn:aws:dynamodb:us-east-1:1:table/Events"),
        ("MY_POD_NAMESPACE", "prod"),
        ("MY_POD_IP", "10.4.2.1"),
    ]);
    let applied = opts.apply().unwrap();
    assert_eq!(applied.config.key_id, "arn:aws:kms:us-east-1:1:key/abc");
    assert_eq!(
        applied.config.storage_locator,
        "arn:aws:dynamodb:us-east-1:1:table/Events"
    );
    assert_eq!(applied.config.stream_name, "10.4.2.1-POD-prod");
}

#[test]
fn primary_name_wins_over_alias() {
    let opts = lookup(&with(&[
        ("AWS_KMS_ARN", "legacy"),
        ("POD_IP", "1.1.1.1"),
        ("MY_POD_IP", "2.2.2.2"),
    ]));
    let applied = opts.apply().unwrap();
    assert_eq!(applied.config.key_id, "alias/load");
    assert_eq!(applied.config.stream_name, "1.1.1.1-POD-");
}

#[test]
fn defaults_when_only_required_set() {
    let applied = lookup(REQUIRED).apply().unwrap();
    assert_eq!(applied.backend, Backend::Aws);
    assert_eq!(applied.kms, KmsChoice::Aws);
    assert_eq!(applied.log_level, log::LevelFilter::Info);
    assert_eq!(applied.config.on_error, ErrorPolicy::Halt);
    assert_eq!(applied.config.object_key, "index.html");
    assert_eq!(applied.config.words_per_sentence, 10);
    assert_eq!(applied.config.schedule.min(), Duration::from_secs(30));
    assert_eq!(applied.config.schedule.max(), Duration::from_secs(60));
    assert_eq!(applied.config.stream_name, "-POD-");
    assert!(applied.config.max_iterations.is_none());
    assert!(applied.aws.region.is_none());
}

#[test]
fn optional_settings_are_applied() {
    let applied = lookup(&with(&[
        ("MIN_SLEEP_SECS", "1"),
        ("MAX_SLEEP_SECS", "2"),
        ("ON_ERROR", "continue"),
        ("MAX_ITERATIONS", "7"),
        ("OBJECT_KEY", "feed.html"),
        ("WORDS_PER_SENTENCE", "4"),
        ("LOG_LEVEL", "debug"),
        ("AWS_REGION", "eu-west-1"),
        ("AWS_ENDPOINT_URL", "http://localhost:4566"),
    ]))
    .apply()
    .unwrap();
    assert_eq!(applied.config.schedule.min(), Duration::from_secs(1));
    assert_eq!(applied.config.schedule.max(), Duration::from_secs(2));
    assert_eq!(applied.config.on_error, ErrorPolicy::LogAndContinue);
    assert_eq!(applied.config.max_iterations, Some(7));
    assert_eq!(applied.config.object_key, "feed.html");
    assert_eq!(applied.config.words_per_sentence, 4);
    assert_eq!(applied.log_level, log::LevelFilter::Debug);
    assert_eq!(applied.aws.region.as_deref(), Some("eu-west-1"));
    assert_eq!(
        applied.aws.endpoint_url.as_deref(),
        Some("http://localhost:4566")
    );
}

#[test]
fn invalid_values_are_configuration_errors() {
    let cases: &[(&'static str, &'static str)] = &[
        ("MIN_SLEEP_SECS", "soon"),
        ("MAX_ITERATIONS", "-1"),
        ("WORDS_PER_SENTENCE", "0"),
        ("ON_ERROR", "retry"),
        ("BACKEND", "gcp"),
        ("KMS", "vault"),
        ("LOG_LEVEL", "loud"),
    ];
    for (name, value) in cases {
        let err = lookup(&with(&[(*name, *value)])).apply().unwrap_err();
        match err {
            Error::Configuration(msg) => assert!(msg.contains(name), "{name}: {msg}"),
            other => panic!("{name}: unexpected {other:?}"),
        }
    }
}

#[test]
fn min_sleep_above_max_is_rejected() {
    let err = lookup(&with(&[("MIN_SLEEP_SECS", "90"), ("MAX_SLEEP_SECS", "60")]))
        .apply()
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn memory_backend_defaults_to_static_kms() {
    let applied = lookup(&with(&[("BACKEND", "memory")])).apply().unwrap();
    assert_eq!(applied.backend, Backend::Memory);
    assert_eq!(
        applied.kms,
        KmsChoice::Static {
            master_key_hex: None
        }
    );
}

#[test]
fn from_json_uses_the_same_names() {
    let json = r#"{
        "AWS_LOG_GROUP_ARN": "arn:aws:logs:us-east-1:1:log-group:json:*",
        "KEY_ID": "k",
        "STORAGE_LOCATOR": "arn:aws:s3:::json-bucket",
        "POD_IP": "10.0.0.2",
        "BACKEND": "memory",
        "MAX_ITERATIONS": "1"
    }"#;
    let opts = ConfigOptions::from_json(json).unwrap();
    assert_eq!(
        opts.log_group_locator.as_deref(),
        Some("arn:aws:logs:us-east-1:1:log-group:json:*")
    );
    let applied = opts.apply().unwrap();
    assert_eq!(applied.config.stream_name, "10.0.0.2-POD-");
    assert_eq!(applied.config.max_iterations, Some(1));
}

#[test]
fn from_json_rejects_garbage() {
    assert!(ConfigOptions::from_json("{not json").is_err());
}

#[test]
fn memory_backend_builds_a_runnable_generator() {
    let opts = lookup(&with(&[
        ("BACKEND", "memory"),
        ("MAX_ITERATIONS", "2"),
        ("MIN_SLEEP_SECS", "0"),
        ("MAX_SLEEP_SECS", "0"),
        ("STATIC_MASTER_KEY_HEX", KEY_HEX),
    ]));
    let (generator, applied) = generator_from_config(&opts, None).unwrap();
    assert_eq!(applied.config.max_iterations, Some(2));
    let (watcher, _broadcaster) = synthload::shutdown::signal();
    let summary = generator.run(&watcher).unwrap();
    assert_eq!(summary.succeeded, 2);
    assert!(!summary.shutdown_requested);
}

#[test]
fn bad_static_key_is_a_configuration_error() {
    let opts = lookup(&with(&[
        ("BACKEND", "memory"),
        ("STATIC_MASTER_KEY_HEX", "abcd"),
    ]));
    let err = generator_from_config(&opts, None).err().expect("should fail");
    assert!(matches!(err, Error::Configuration(_)), "{err:?}");
}

#[test]
fn from_json_prefers_primary_name_like_the_environment() {
    let json = r#"{
        "LOG_GROUP_LOCATOR": "arn:aws:logs:us-east-1:1:log-group:json:*",
        "KEY_ID": "primary",
        "AWS_KMS_ARN": "legacy",
        "STORAGE_LOCATOR": "arn:aws:s3:::json-bucket",
        "MAX_ITERATIONS": 3
    }"#;
    let from_json = ConfigOptions::from_json(json).unwrap();
    let from_env = lookup(&[
        (
            "LOG_GROUP_LOCATOR",
            "arn:aws:logs:us-east-1:1:log-group:json:*",
        ),
        ("KEY_ID", "primary"),
        ("AWS_KMS_ARN", "legacy"),
        ("STORAGE_LOCATOR", "arn:aws:s3:::json-bucket"),
        ("MAX_ITERATIONS", "3"),
    ]);
    assert_eq!(from_json, from_env);
    assert_eq!(from_json.key_id.as_deref(), Some("primary"));
    assert_eq!(from_json.apply().unwrap().config.max_iterations, Some(3));
}

#[test]
fn from_json_rejects_nested_values() {
    assert!(ConfigOptions::from_json(r#"{"KEY_ID": ["a", "b"]}"#).is_err());
}

#[test]
fn sleep_bounds_beyond_millisecond_range_are_rejected() {
    let err = lookup(&with(&[
        ("MIN_SLEEP_SECS", "18446744073709551"),
        ("MAX_SLEEP_SECS", "18446744073709552"),
    ]))
    .apply()
    .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err:?}");
}

#[test]
fn zero_iteration_limit_runs_nothing() {
    let opts = lookup(&with(&[("BACKEND", "memory"), ("MAX_ITERATIONS", "0")]));
    let (generator, _) = generator_from_config(&opts, None).unwrap();
    let (watcher, _broadcaster) = synthload::shutdown::signal();
    let summary = generator.run(&watcher).unwrap();
    assert_eq!(summary.attempted(), 0);
    assert!(!summary.shutdown_requested);
}
