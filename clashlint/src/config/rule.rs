use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Targets that are always routable without a proxy group.
pub const BUILTIN_TARGETS: [&str; 3] = ["DIRECT", "REJECT", "PASS"];

pub const DEFAULT_MATCH_RULE: &str = "MATCH,Final";

pub fn is_builtin_target(target: &str) -> bool {
    BUILTIN_TARGETS.contains(&target)
}

// Warning: order matters here; a string must be tried before the catch-all value
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RuleEntry {
    Literal(String),
    Other(serde_yaml::Value),
}

impl RuleEntry {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RuleEntry::Literal(s) => Some(s.as_str()),
            RuleEntry::Other(_) => None,
        }
    }
}

impl From<&str> for RuleEntry {
    fn from(s: &str) -> Self {
        RuleEntry::Literal(s.to_string())
    }
}

impl From<String> for RuleEntry {
    fn from(s: String) -> Self {
        RuleEntry::Literal(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    RuleSet,
    Domain,
    DomainSuffix,
    DomainKeyword,
    IpCidr,
    GeoIp,
    Match,
    ProcessName,
}

impl FromStr for RuleType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RULE-SET" => Ok(Self::RuleSet),
            "DOMAIN" => Ok(Self::Domain),
            "DOMAIN-SUFFIX" => Ok(Self::DomainSuffix),
            "DOMAIN-KEYWORD" => Ok(Self::DomainKeyword),
            "IP-CIDR" => Ok(Self::IpCidr),
            "GEOIP" => Ok(Self::GeoIp),
            "MATCH" => Ok(Self::Match),
            "PROCESS-NAME" => Ok(Self::ProcessName),
            _ => Err(()),
        }
    }
}

/// A rule literal split on commas, e.g. `IP-CIDR,10.0.0.0/8,DIRECT,no-resolve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine<'a> {
    parts: Vec<&'a str>,
}

impl<'a> RuleLine<'a> {
    pub fn parse(literal: &'a str) -> Self {
        Self {
            parts: literal.split(',').collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn rule_type(&self) -> &'a str {
        self.parts[0].trim()
    }

    pub fn kind(&self) -> Option<RuleType> {
        self.rule_type().parse().ok()
    }

    pub fn content(&self) -> Option<&'a str> {
        self.field(1)
    }

    pub fn target(&self) -> Option<&'a str> {
        self.field(2)
    }

    fn field(&self, idx: usize) -> Option<&'a str> {
        self.parts
            .get(idx)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    pub fn is_match(&self) -> bool {
        self.kind() == Some(RuleType::Match)
    }

    /// Rebuild the literal with the third field replaced; trailing options are kept.
    pub fn with_target(&self, target: &str) -> Option<String> {
        let mut parts: Vec<&str> = self.parts.clone();
        *parts.get_mut(2)? = target;
        Some(parts.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_line() {
        let line = RuleLine::parse("IP-CIDR, 10.0.0.0/8 ,Proxy,no-resolve");
        assert_eq!(line.len(), 4);
        assert_eq!(line.kind(), Some(RuleType::IpCidr));
        assert_eq!(line.content(), Some("10.0.0.0/8"));
        assert_eq!(line.target(), Some("Proxy"));
        assert_eq!(
            line.with_target("DIRECT").as_deref(),
            Some("IP-CIDR, 10.0.0.0/8 ,DIRECT,no-resolve")
        );

        let line = RuleLine::parse("MATCH,Final");
        assert!(line.is_match());
        assert_eq!(line.content(), Some("Final"));
        assert_eq!(line.target(), None);
        assert_eq!(line.with_target("Proxy"), None);
        assert!(RuleLine::parse(" MATCH ,DIRECT").is_match());
        assert!(!RuleLine::parse("match,DIRECT").is_match());

        let line = RuleLine::parse("DOMAIN,,");
        assert_eq!(line.len(), 3);
        assert_eq!(line.content(), None);
        assert_eq!(line.target(), None);

        assert_eq!(RuleLine::parse("GEOIP").len(), 1);
        assert!(is_builtin_target("PASS"));
        assert!(!is_builtin_target("Proxy"));
    }
}
