pub mod field;
mod proxy_group;
mod report;
mod rule;
mod rule_provider;
pub mod schema;

pub use proxy_group::*;
pub use report::*;
pub use rule::*;
pub use rule_provider::*;

use crate::config::ClashConfig;
use clashapi::{IssueLevel, ValidationResult};

/// Run every structural check over a configuration snapshot. Each call builds
/// a fresh result; nothing is retained between calls.
pub fn validate_config(config: &ClashConfig) -> ValidationResult {
    tracing::debug!(
        groups = config.proxy_groups.len(),
        rules = config.rules.len(),
        providers = config.rule_providers.len(),
        "Validating configuration"
    );
    let proxy_groups = check_proxy_groups(&config.proxy_groups);

    let mut rules = check_rule_syntax(&config.rules);
    let rule_providers = check_rule_providers(&config.rule_providers);
    rules.extend(check_rule_targets(&config.rules, &config.proxy_groups));
    rules.extend(check_rule_priority(&config.rules));

    let result = ValidationResult::new(proxy_groups, rules, rule_providers);
    tracing::debug!(
        overall = result.overall,
        errors = result.count(IssueLevel::Error),
        warnings = result.count(IssueLevel::Warning),
        infos = result.count(IssueLevel::Info),
        "Validation finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use clashapi::{IssueKind, Subject};

    fn config(text: &str) -> ClashConfig {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_empty_config_passes() {
        let result = validate_config(&ClashConfig::default());
        assert!(result.overall);
        assert!(result.is_clean());
        assert!(logs_contain("Validation finished"));

        let result = validate_config(&config("rules: ['GEOIP,CN,DIRECT']"));
        assert!(result.overall);
        assert_eq!(result.rules.len(), 1);
        assert_eq!(result.rules[0].kind, IssueKind::MissingMatch);
    }

    #[test]
    fn test_scenario_missing_target() {
        let result = validate_config(&config(
            "
proxy-groups:
  - {name: Proxy, type: select, proxies: [DIRECT]}
rules:
  - RULE-SET,youtube,YouTube
  - MATCH,Final
",
        ));
        assert!(!result.overall);
        assert!(result.proxy_groups.is_empty());
        let errors: Vec<_> = result.rules.iter().filter(|i| i.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .message
            .contains("target proxy group 'YouTube' does not exist"));
        assert_eq!(
            errors[0].subject,
            Subject::Rule {
                index: 0,
                literal: Some("RULE-SET,youtube,YouTube".to_string())
            }
        );
    }

    #[test]
    fn test_scenario_single_match() {
        let result = validate_config(&config(
            "
proxy-groups:
  - {name: Proxy, type: select, proxies: [DIRECT]}
rules:
  - MATCH,Final
",
        ));
        assert!(result.overall);
        assert!(result.is_clean());
    }

    #[test]
    fn test_scenario_duplicate_group() {
        let result = validate_config(&config(
            "
proxy-groups:
  - {name: A, type: select}
  - {name: A, type: select}
rules:
  - MATCH,A
",
        ));
        assert!(!result.overall);
        let dup: Vec<_> = result
            .proxy_groups
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::GroupDuplicateName { .. }))
            .collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(
            dup[0].subject,
            Subject::ProxyGroup {
                index: 1,
                name: Some("A".to_string())
            }
        );
    }

    #[test]
    fn test_scenario_bad_provider_url() {
        let result = validate_config(&config(
            "
rule-providers:
  x: {url: not-a-url}
rules:
  - MATCH,DIRECT
",
        ));
        assert!(!result.overall);
        assert_eq!(result.rule_providers.len(), 1);
        assert_eq!(
            result.rule_providers[0].message,
            "Rule provider 'x': URL format incorrect"
        );
    }

    #[test]
    fn test_multiple_match_is_only_a_warning() {
        let result = validate_config(&config(
            "
rules:
  - GEOIP,CN,DIRECT
  - MATCH,DIRECT
  - MATCH,REJECT
",
        ));
        assert!(result.overall);
        assert!(result
            .rules
            .iter()
            .any(|i| i.message.contains("multiple MATCH rules found")));
    }

    #[test]
    fn test_unused_group_does_not_block() {
        let result = validate_config(&config(
            "
proxy-groups:
  - {name: Netflix, type: select, proxies: [DIRECT], category: application}
rules:
  - MATCH,DIRECT
",
        ));
        assert!(result.overall);
        assert_eq!(result.count(IssueLevel::Info), 1);
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let bad = config("rules: [FOO]");
        let good = config("rules: ['MATCH,DIRECT']");
        assert!(!validate_config(&bad).overall);
        let result = validate_config(&good);
        assert!(result.is_clean());
        assert_eq!(validate_config(&bad), validate_config(&bad));
    }

    #[test]
    fn test_wrong_typed_fields_still_validate() {
        let shapes = [
            ("proxy-groups: [{name: 123, type: select, proxies: [DIRECT]}]\nrules: ['MATCH,123']", true),
            ("proxy-groups: [{name: A, type: select, proxies: [1]}]\nrules: ['MATCH,A']", true),
            ("proxy-groups: [{name: A, type: url-test, proxies: [a], interval: '300'}]\nrules: ['MATCH,A']", true),
            ("proxy-groups: [{name: A, type: url-test, proxies: [a], interval: -5}]\nrules: ['MATCH,A']", true),
            ("proxy-groups: [A]\nrules: ['MATCH,DIRECT']", false),
            ("rule-providers: {p: {url: 'https://a/p', interval: 3600.5}}\nrules: ['MATCH,DIRECT']", true),
        ];
        for (text, overall) in shapes {
            let (_, cfg) = parse_config("inline", text).unwrap();
            assert_eq!(validate_config(&cfg).overall, overall, "{}", text);
        }

        let (_, cfg) = parse_config("inline", "proxy-groups: [A]").unwrap();
        assert_eq!(
            validate_config(&cfg).proxy_groups[0].kind,
            IssueKind::GroupNotMapping { index: 0 }
        );
        let (document, cfg) = parse_config(
            "inline",
            "proxy-groups: [{name: A, type: url-test, proxies: [a], interval: -5}]",
        )
        .unwrap();
        assert!(validate_config(&cfg)
            .proxy_groups
            .iter()
            .any(|i| i.message == "Proxy group 'A': field 'interval' has a value of the wrong type"));
        assert!(schema::validate_document(&document)
            .iter()
            .any(|m| m.starts_with("proxy-groups[0].interval")));
    }
}
