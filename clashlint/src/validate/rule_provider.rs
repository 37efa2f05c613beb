use crate::config::{ProviderBehavior, ProviderFormat, RuleProvider, PROVIDER_INTERVAL_RANGE};
use crate::validate::field::is_absolute_url;
use clashapi::{Issue, IssueKind, Subject};
use linked_hash_map::LinkedHashMap;

pub fn check_rule_providers(providers: &LinkedHashMap<String, RuleProvider>) -> Vec<Issue> {
    let mut issues = vec![];
    for (name, provider) in providers {
        if provider.is_malformed() {
            issues.push(Issue::new(
                IssueKind::ProviderNotMapping { name: name.clone() },
                Subject::RuleProvider { name: name.clone() },
            ));
            continue;
        }
        let mut push = |kind| {
            issues.push(Issue::new(
                kind,
                Subject::RuleProvider { name: name.clone() },
            ))
        };
        match provider.url() {
            None => push(IssueKind::ProviderMissingUrl { name: name.clone() }),
            Some(url) if !is_absolute_url(url) => {
                push(IssueKind::ProviderBadUrl { name: name.clone() })
            }
            Some(_) => {}
        }
        for field in provider.unreadable_fields() {
            push(IssueKind::ProviderFieldUnreadable {
                name: name.clone(),
                field: field.to_string(),
            });
        }
        if let Some(behavior) = provider.behavior() {
            if behavior.parse::<ProviderBehavior>().is_err() {
                push(IssueKind::ProviderUnusualBehavior {
                    name: name.clone(),
                    behavior: behavior.to_string(),
                });
            }
        }
        if let Some(format) = provider.format() {
            if format.parse::<ProviderFormat>().is_err() {
                push(IssueKind::ProviderUnusualFormat {
                    name: name.clone(),
                    format: format.to_string(),
                });
            }
        }
        if let Some(interval) = provider.interval() {
            if !PROVIDER_INTERVAL_RANGE.contains(&interval) {
                push(IssueKind::ProviderIntervalOutOfRange {
                    name: name.clone(),
                    interval,
                });
            }
        }
    }
    tracing::debug!(
        providers = providers.len(),
        issues = issues.len(),
        "Rule providers checked"
    );
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use clashapi::IssueLevel;

    fn providers(text: &str) -> LinkedHashMap<String, RuleProvider> {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_provider_url() {
        let issues = check_rule_providers(&providers(
            "
x: {url: not-a-url}
y: {behavior: domain}
z: {url: 'https://example.com/z.yaml', behavior: domain, format: yaml, interval: 86400}
",
        ));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "Rule provider 'x': URL format incorrect");
        assert_eq!(
            issues[0].subject,
            Subject::RuleProvider {
                name: "x".to_string()
            }
        );
        assert_eq!(issues[1].message, "Rule provider 'y': missing URL");
        assert!(issues.iter().all(|i| i.level == IssueLevel::Error));
    }

    #[test]
    fn test_provider_soft_checks() {
        let issues = check_rule_providers(&providers(
            "
a: {url: 'https://example.com/a', behavior: geosite, format: mrs, interval: 30}
b: {url: 'https://example.com/b', interval: 604800}
c: {url: 'https://example.com/c', interval: 604801}
d: {url: 'https://example.com/d', interval: 0}
",
        ));
        let kinds: Vec<_> = issues.iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::ProviderUnusualBehavior {
                    name: "a".to_string(),
                    behavior: "geosite".to_string()
                },
                IssueKind::ProviderUnusualFormat {
                    name: "a".to_string(),
                    format: "mrs".to_string()
                },
                IssueKind::ProviderIntervalOutOfRange {
                    name: "a".to_string(),
                    interval: 30
                },
                IssueKind::ProviderIntervalOutOfRange {
                    name: "c".to_string(),
                    interval: 604801
                },
            ]
        );
        assert!(issues.iter().all(|i| i.level == IssueLevel::Warning));
    }

    #[test]
    fn test_unusable_provider_entries() {
        let issues = check_rule_providers(&providers(
            "
a: 5
b: {url: 'https://example.com/b', interval: 3600.5}
",
        ));
        let kinds: Vec<_> = issues.iter().map(|i| i.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::ProviderNotMapping {
                    name: "a".to_string()
                },
                IssueKind::ProviderFieldUnreadable {
                    name: "b".to_string(),
                    field: "interval".to_string()
                },
            ]
        );
        assert_eq!(issues[0].level, IssueLevel::Error);
        assert_eq!(issues[1].level, IssueLevel::Warning);
    }
}
