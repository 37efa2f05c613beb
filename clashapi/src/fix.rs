use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum FixSeverity {
    High,
    Medium,
    Low,
}

impl FixSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixSeverity::High => "high",
            FixSeverity::Medium => "medium",
            FixSeverity::Low => "low",
        }
    }
}

impl Display for FixSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixSeverity {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown name: {0}")]
pub struct UnknownName(pub String);

/// Remediation operations, named by their action identifier.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FixActionKind {
    AddProxyGroupName,
    AddProxyGroupType,
    FixDuplicateProxyGroupName,
    AddProxyGroupProxies,
    AddProxyGroupInterval,
    FixRuleTarget,
    FixRuleFormat,
    FixMatchRulePosition,
    AddMatchRule,
    HandleUnusedProxyGroup,
    AddRuleProviderUrl,
    FixRuleProviderUrl,
}

impl FixActionKind {
    pub const ALL: [FixActionKind; 12] = [
        FixActionKind::AddProxyGroupName,
        FixActionKind::AddProxyGroupType,
        FixActionKind::FixDuplicateProxyGroupName,
        FixActionKind::AddProxyGroupProxies,
        FixActionKind::AddProxyGroupInterval,
        FixActionKind::FixRuleTarget,
        FixActionKind::FixRuleFormat,
        FixActionKind::FixMatchRulePosition,
        FixActionKind::AddMatchRule,
        FixActionKind::HandleUnusedProxyGroup,
        FixActionKind::AddRuleProviderUrl,
        FixActionKind::FixRuleProviderUrl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixActionKind::AddProxyGroupName => "addProxyGroupName",
            FixActionKind::AddProxyGroupType => "addProxyGroupType",
            FixActionKind::FixDuplicateProxyGroupName => "fixDuplicateProxyGroupName",
            FixActionKind::AddProxyGroupProxies => "addProxyGroupProxies",
            FixActionKind::AddProxyGroupInterval => "addProxyGroupInterval",
            FixActionKind::FixRuleTarget => "fixRuleTarget",
            FixActionKind::FixRuleFormat => "fixRuleFormat",
            FixActionKind::FixMatchRulePosition => "fixMatchRulePosition",
            FixActionKind::AddMatchRule => "addMatchRule",
            FixActionKind::HandleUnusedProxyGroup => "handleUnusedProxyGroup",
            FixActionKind::AddRuleProviderUrl => "addRuleProviderUrl",
            FixActionKind::FixRuleProviderUrl => "fixRuleProviderUrl",
        }
    }

    /// Short category tag shown next to the action.
    pub fn tag(&self) -> &'static str {
        match self {
            FixActionKind::AddProxyGroupName => "proxy-group-name",
            FixActionKind::AddProxyGroupType => "proxy-group-type",
            FixActionKind::FixDuplicateProxyGroupName => "proxy-group-duplicate",
            FixActionKind::AddProxyGroupProxies => "proxy-group-proxies",
            FixActionKind::AddProxyGroupInterval => "proxy-group-interval",
            FixActionKind::FixRuleTarget => "rule-target-missing",
            FixActionKind::FixRuleFormat => "rule-format",
            FixActionKind::FixMatchRulePosition => "rule-match-position",
            FixActionKind::AddMatchRule => "rule-match-missing",
            FixActionKind::HandleUnusedProxyGroup => "unused-proxy-group",
            FixActionKind::AddRuleProviderUrl => "rule-provider-url",
            FixActionKind::FixRuleProviderUrl => "rule-provider-url-format",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FixActionKind::AddProxyGroupName => "Add a name to the proxy group",
            FixActionKind::AddProxyGroupType => "Set the proxy group type",
            FixActionKind::FixDuplicateProxyGroupName => "Rename the duplicated proxy group",
            FixActionKind::AddProxyGroupProxies => "Add members to the select proxy group",
            FixActionKind::AddProxyGroupInterval => "Set a test interval for the auto-test group",
            FixActionKind::FixRuleTarget => "Point the rule at an existing proxy group",
            FixActionKind::FixRuleFormat => "Fix the rule format",
            FixActionKind::FixMatchRulePosition => "Move the MATCH rule to the end",
            FixActionKind::AddMatchRule => "Append a MATCH catch-all rule",
            FixActionKind::HandleUnusedProxyGroup => "Handle the unused proxy group",
            FixActionKind::AddRuleProviderUrl => "Add a URL to the rule provider",
            FixActionKind::FixRuleProviderUrl => "Fix the rule provider URL",
        }
    }

    pub fn severity(&self) -> FixSeverity {
        match self {
            FixActionKind::AddProxyGroupName
            | FixActionKind::AddProxyGroupType
            | FixActionKind::FixDuplicateProxyGroupName
            | FixActionKind::FixRuleTarget
            | FixActionKind::FixRuleFormat
            | FixActionKind::AddRuleProviderUrl
            | FixActionKind::FixRuleProviderUrl => FixSeverity::High,
            FixActionKind::AddProxyGroupProxies
            | FixActionKind::FixMatchRulePosition
            | FixActionKind::AddMatchRule => FixSeverity::Medium,
            FixActionKind::AddProxyGroupInterval | FixActionKind::HandleUnusedProxyGroup => {
                FixSeverity::Low
            }
        }
    }
}

impl Display for FixActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixActionKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// The subject(s) an action works on, keyed by position captured at validation time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "on", rename_all = "kebab-case")]
pub enum FixData {
    ProxyGroup { index: usize, name: Option<String> },
    Rule { index: usize, literal: String },
    RuleList,
    RuleProvider { name: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FixAction {
    #[serde(rename = "type")]
    pub tag: String,
    pub description: String,
    pub action: FixActionKind,
    pub data: FixData,
    pub severity: FixSeverity,
}

impl FixAction {
    pub fn new(action: FixActionKind, data: FixData) -> Self {
        Self {
            tag: action.tag().to_string(),
            description: action.description().to_string(),
            action,
            data,
            severity: action.severity(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub success: bool,
    pub message: String,
}

impl FixOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_identifier() {
        for kind in FixActionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<FixActionKind>(), Ok(kind));
        }
        assert!("addMatch".parse::<FixActionKind>().is_err());
    }

    #[test]
    fn test_fix_action_shape() {
        let action = FixAction::new(FixActionKind::AddMatchRule, FixData::RuleList);
        assert_eq!(action.severity, FixSeverity::Medium);
        let v = serde_json::to_value(&action).unwrap();
        assert_eq!(v["type"], "rule-match-missing");
        assert_eq!(v["action"], "addMatchRule");
        assert_eq!(v["severity"], "medium");
        assert_eq!(v["data"]["on"], "rule-list");
    }
}
