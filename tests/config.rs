use estate_token_demo::config::AppConfig;
use estate_token_demo::domain::catalog::SortKey;
use estate_token_demo::domain::errors::ConfigurationError;
use estate_token_demo::domain::investment::AmountPolicy;
use estate_token_demo::domain::logging::LogLevel;
use estate_token_demo::infrastructure::FailureInjection;

#[test]
fn defaults_match_the_demo() {
    let config = AppConfig::default();
    assert_eq!(config.investment.settings.amount_policy, AmountPolicy::Clamp);
    assert_eq!(config.investment.settings.retry.max_attempts, 3);
    assert_eq!(config.investment.settlement_delay_ms, 3_000);
    assert_eq!(config.investment.failure, FailureInjection::Never);
    assert_eq!(config.returns.platform_yield_percent, 7.2);
    assert_eq!(config.catalog.markets_criteria().unwrap().sort, SortKey::MarketCap);
    assert_eq!(config.catalog.properties_criteria().unwrap().sort, SortKey::Newest);
    assert_eq!(config.catalog.properties_criteria().unwrap().max_investment, Some(10_000.0));
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = AppConfig::from_json_str(
        r#"{
            "investment": {
                "amountPolicy": "reject",
                "settlementDelayMs": 250,
                "failure": { "mode": "firstAttempts", "value": 2 },
                "retry": { "maxAttempts": 5 }
            },
            "logging": { "level": "debug" }
        }"#,
    )
    .unwrap();

    assert_eq!(config.investment.settings.amount_policy, AmountPolicy::Reject);
    assert_eq!(config.investment.settings.transaction_fee, 0.05);
    assert_eq!(config.investment.settlement_delay_ms, 250);
    assert_eq!(config.investment.failure, FailureInjection::FirstAttempts(2));
    assert_eq!(config.investment.settings.retry.max_attempts, 5);
    assert_eq!(config.investment.settings.retry.base_delay_ms, 500);
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(
        AppConfig::from_json_str("{ not json"),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn unknown_default_sort_is_rejected() {
    let err = AppConfig::from_json_str(r#"{ "catalog": { "marketsSort": "Hotness" } }"#).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownSortKey("Hotness".into()));
}

#[test]
fn out_of_range_values_are_rejected() {
    for json in [
        r#"{ "investment": { "transactionFee": -1 } }"#,
        r#"{ "investment": { "retry": { "maxAttempts": 0 } } }"#,
        r#"{ "investment": { "failure": { "mode": "rate", "value": 2.0 } } }"#,
        r#"{ "investment": { "explorerBaseUrl": "polygonscan" } }"#,
        r#"{ "returns": { "platformYieldPercent": -3 } }"#,
    ] {
        assert!(
            matches!(AppConfig::from_json_str(json), Err(ConfigurationError::InvalidParameter(_))),
            "{json} should be rejected"
        );
    }
}
