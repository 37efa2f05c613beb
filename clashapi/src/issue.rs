use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
    Info,
}

impl IssueLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
            IssueLevel::Info => "info",
        }
    }
}

impl Display for IssueLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was found. Every issue carries one of these; its message and
/// suggestion are rendered from it, and fix derivation dispatches on it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum IssueKind {
    // proxy groups
    GroupNotMapping {
        index: usize,
    },
    GroupFieldUnreadable {
        name: String,
        field: String,
    },
    GroupMissingName {
        index: usize,
    },
    GroupMissingType {
        name: String,
    },
    GroupDuplicateName {
        name: String,
    },
    SelectWithoutProxies {
        name: String,
    },
    MissingTestInterval {
        name: String,
        group_type: String,
    },
    MissingStrategy {
        name: String,
    },
    RegionWithoutFilter {
        name: String,
    },
    // rules
    RuleNotString {
        index: usize,
    },
    RuleMalformed {
        index: usize,
        rule: String,
    },
    UnsupportedRuleType {
        index: usize,
        rule_type: String,
    },
    EmptyRuleContent {
        index: usize,
    },
    EmptyRuleTarget {
        index: usize,
    },
    TargetNotFound {
        index: usize,
        target: String,
    },
    UnusedGroup {
        name: String,
    },
    MultipleMatch {
        index: usize,
    },
    RuleAfterMatch {
        index: usize,
    },
    MissingMatch,
    // rule providers
    ProviderNotMapping {
        name: String,
    },
    ProviderFieldUnreadable {
        name: String,
        field: String,
    },
    ProviderMissingUrl {
        name: String,
    },
    ProviderBadUrl {
        name: String,
    },
    ProviderUnusualBehavior {
        name: String,
        behavior: String,
    },
    ProviderUnusualFormat {
        name: String,
        format: String,
    },
    ProviderIntervalOutOfRange {
        name: String,
        interval: i64,
    },
}

/// Rule types accepted by the syntax check, in display order.
pub const SUPPORTED_RULE_TYPES: &str =
    "RULE-SET, DOMAIN, DOMAIN-SUFFIX, DOMAIN-KEYWORD, IP-CIDR, GEOIP, MATCH, PROCESS-NAME";

impl IssueKind {
    pub fn level(&self) -> IssueLevel {
        match self {
            IssueKind::GroupNotMapping { .. }
            | IssueKind::GroupMissingName { .. }
            | IssueKind::GroupMissingType { .. }
            | IssueKind::GroupDuplicateName { .. }
            | IssueKind::RuleNotString { .. }
            | IssueKind::RuleMalformed { .. }
            | IssueKind::UnsupportedRuleType { .. }
            | IssueKind::EmptyRuleContent { .. }
            | IssueKind::EmptyRuleTarget { .. }
            | IssueKind::TargetNotFound { .. }
            | IssueKind::ProviderNotMapping { .. }
            | IssueKind::ProviderMissingUrl { .. }
            | IssueKind::ProviderBadUrl { .. } => IssueLevel::Error,
            IssueKind::UnusedGroup { .. } => IssueLevel::Info,
            _ => IssueLevel::Warning,
        }
    }

    pub fn message(&self) -> String {
        match self {
            IssueKind::GroupNotMapping { index } => {
                format!("Proxy group #{}: entry must be a mapping", index + 1)
            }
            IssueKind::GroupFieldUnreadable { name, field } => format!(
                "Proxy group '{}': field '{}' has a value of the wrong type",
                name, field
            ),
            IssueKind::GroupMissingName { index } => {
                format!("Proxy group #{}: missing name", index + 1)
            }
            IssueKind::GroupMissingType { name } => {
                format!("Proxy group '{}': missing type", name)
            }
            IssueKind::GroupDuplicateName { name } => {
                format!("Duplicate proxy group name: '{}'", name)
            }
            IssueKind::SelectWithoutProxies { name } => {
                format!("Proxy group '{}': select type should list members", name)
            }
            IssueKind::MissingTestInterval { name, group_type } => format!(
                "Proxy group '{}': {} type should set test interval",
                name, group_type
            ),
            IssueKind::MissingStrategy { name } => format!(
                "Proxy group '{}': load-balance type should set a balancing strategy",
                name
            ),
            IssueKind::RegionWithoutFilter { name } => {
                format!("Region proxy group '{}': missing node filter", name)
            }
            IssueKind::RuleNotString { index } => {
                format!("Rule #{}: rule must be a string", index + 1)
            }
            IssueKind::RuleMalformed { index, rule } => {
                format!("Rule #{}: format incorrect '{}'", index + 1, rule)
            }
            IssueKind::UnsupportedRuleType { index, rule_type } => {
                format!("Rule #{}: unsupported rule type '{}'", index + 1, rule_type)
            }
            IssueKind::EmptyRuleContent { index } => {
                format!("Rule #{}: rule content must not be empty", index + 1)
            }
            IssueKind::EmptyRuleTarget { index } => {
                format!("Rule #{}: rule target must not be empty", index + 1)
            }
            IssueKind::TargetNotFound { index, target } => format!(
                "Rule #{}: target proxy group '{}' does not exist",
                index + 1,
                target
            ),
            IssueKind::UnusedGroup { name } => {
                format!("Proxy group '{}' is not used by any rule", name)
            }
            IssueKind::MultipleMatch { index } => {
                format!("Rule #{}: multiple MATCH rules found", index + 1)
            }
            IssueKind::RuleAfterMatch { index } => {
                format!("Rule #{}: rule after MATCH is unreachable", index + 1)
            }
            IssueKind::MissingMatch => "Missing MATCH rule".to_string(),
            IssueKind::ProviderNotMapping { name } => {
                format!("Rule provider '{}': entry must be a mapping", name)
            }
            IssueKind::ProviderFieldUnreadable { name, field } => format!(
                "Rule provider '{}': field '{}' has a value of the wrong type",
                name, field
            ),
            IssueKind::ProviderMissingUrl { name } => {
                format!("Rule provider '{}': missing URL", name)
            }
            IssueKind::ProviderBadUrl { name } => {
                format!("Rule provider '{}': URL format incorrect", name)
            }
            IssueKind::ProviderUnusualBehavior { name, behavior } => format!(
                "Rule provider '{}': unusual behavior value '{}'",
                name, behavior
            ),
            IssueKind::ProviderUnusualFormat { name, format } => {
                format!("Rule provider '{}': unusual format value '{}'", name, format)
            }
            IssueKind::ProviderIntervalOutOfRange { name, interval } => format!(
                "Rule provider '{}': unreasonable update interval ({} seconds)",
                name, interval
            ),
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        let s = match self {
            IssueKind::GroupNotMapping { .. } => {
                "Write the group as a mapping with name, type and proxies".to_string()
            }
            IssueKind::GroupFieldUnreadable { .. } | IssueKind::ProviderFieldUnreadable { .. } => {
                "Check the value type of this field".to_string()
            }
            IssueKind::GroupMissingName { .. } => "Set a name for the proxy group".to_string(),
            IssueKind::GroupMissingType { .. } => {
                "Set the group type (select, url-test, fallback, load-balance)".to_string()
            }
            IssueKind::GroupDuplicateName { .. } => "Use a unique proxy group name".to_string(),
            IssueKind::SelectWithoutProxies { .. } => {
                "Add proxy groups or nodes to the proxies list".to_string()
            }
            IssueKind::MissingTestInterval { .. } => {
                "Set the interval field (e.g. 300 seconds)".to_string()
            }
            IssueKind::MissingStrategy { .. } => {
                "Set the strategy field (consistent-hashing or round-robin)".to_string()
            }
            IssueKind::RegionWithoutFilter { .. } => {
                "Set the filter field to select the nodes of this region".to_string()
            }
            IssueKind::RuleNotString { .. } => "Check the rule format".to_string(),
            IssueKind::RuleMalformed { .. } => {
                "Rules are written as TYPE,CONTENT,TARGET".to_string()
            }
            IssueKind::UnsupportedRuleType { .. } => {
                format!("Supported types: {}", SUPPORTED_RULE_TYPES)
            }
            IssueKind::EmptyRuleContent { .. } => "Provide valid rule content".to_string(),
            IssueKind::EmptyRuleTarget { .. } => "Name the target proxy group".to_string(),
            IssueKind::TargetNotFound { target, .. } => format!(
                "Create proxy group '{}' or change the rule target",
                target
            ),
            IssueKind::UnusedGroup { .. } => {
                "Add rules routing to this group or remove it".to_string()
            }
            IssueKind::MultipleMatch { .. } => {
                "Keep a single MATCH rule at the end of the rule list".to_string()
            }
            IssueKind::RuleAfterMatch { .. } => {
                "MATCH must be the last rule of the list".to_string()
            }
            IssueKind::MissingMatch => {
                "Append 'MATCH,Final' as the catch-all rule".to_string()
            }
            IssueKind::ProviderNotMapping { .. } => {
                "Write the provider as a mapping with url and behavior".to_string()
            }
            IssueKind::ProviderMissingUrl { .. } => {
                "Set a valid rule file URL".to_string()
            }
            IssueKind::ProviderBadUrl { .. } => "Provide a valid HTTP/HTTPS URL".to_string(),
            IssueKind::ProviderUnusualBehavior { .. } => {
                "Common values: classical, domain, ipcidr".to_string()
            }
            IssueKind::ProviderUnusualFormat { .. } => "Common values: text, yaml".to_string(),
            IssueKind::ProviderIntervalOutOfRange { .. } => {
                "Keep the interval between 60 seconds and 7 days".to_string()
            }
        };
        Some(s)
    }
}

/// Stable key of the configuration entry an issue points at.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "on", rename_all = "kebab-case")]
pub enum Subject {
    ProxyGroup { index: usize, name: Option<String> },
    Rule { index: usize, literal: Option<String> },
    RuleProvider { name: String },
    RuleList,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    #[serde(rename = "type")]
    pub level: IssueLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub kind: IssueKind,
    pub subject: Subject,
}

impl Issue {
    pub fn new(kind: IssueKind, subject: Subject) -> Self {
        Self {
            level: kind.level(),
            message: kind.message(),
            suggestion: kind.suggestion(),
            kind,
            subject,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    #[serde(rename = "proxyGroups")]
    pub proxy_groups: Vec<Issue>,
    pub rules: Vec<Issue>,
    #[serde(rename = "ruleProviders")]
    pub rule_providers: Vec<Issue>,
    pub overall: bool,
}

impl ValidationResult {
    /// Assemble a result; `overall` is derived from the buckets.
    pub fn new(proxy_groups: Vec<Issue>, rules: Vec<Issue>, rule_providers: Vec<Issue>) -> Self {
        let overall = !proxy_groups
            .iter()
            .chain(rules.iter())
            .chain(rule_providers.iter())
            .any(Issue::is_error);
        Self {
            proxy_groups,
            rules,
            rule_providers,
            overall,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.overall
            && self.proxy_groups.is_empty()
            && self.rules.is_empty()
            && self.rule_providers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.proxy_groups
            .iter()
            .chain(self.rules.iter())
            .chain(self.rule_providers.iter())
    }

    pub fn count(&self, level: IssueLevel) -> usize {
        self.iter().filter(|i| i.level == level).count()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new(vec![], vec![], vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_follows_errors() {
        let info = Issue::new(
            IssueKind::UnusedGroup {
                name: "YouTube".to_string(),
            },
            Subject::ProxyGroup {
                index: 0,
                name: Some("YouTube".to_string()),
            },
        );
        let result = ValidationResult::new(vec![], vec![info], vec![]);
        assert!(result.overall);
        assert!(!result.is_clean());

        let err = Issue::new(
            IssueKind::ProviderBadUrl {
                name: "x".to_string(),
            },
            Subject::RuleProvider {
                name: "x".to_string(),
            },
        );
        let result = ValidationResult::new(vec![], vec![], vec![err]);
        assert!(!result.overall);
        assert_eq!(result.count(IssueLevel::Error), 1);
    }

    #[test]
    fn test_issue_wire_shape() {
        let issue = Issue::new(
            IssueKind::TargetNotFound {
                index: 0,
                target: "YouTube".to_string(),
            },
            Subject::Rule {
                index: 0,
                literal: Some("RULE-SET,youtube,YouTube".to_string()),
            },
        );
        let v = serde_json::to_value(&issue).unwrap();
        assert_eq!(v["type"], "error");
        assert_eq!(
            v["message"],
            "Rule #1: target proxy group 'YouTube' does not exist"
        );
        assert_eq!(v["kind"]["kind"], "target-not-found");
        assert_eq!(v["subject"]["on"], "rule");
        let back: Issue = serde_json::from_value(v).unwrap();
        assert_eq!(back, issue);
    }
}
