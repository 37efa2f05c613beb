use crate::config::coerce::{
    as_integer, as_text, as_text_list, number_value, text_list_value, text_value, unreadable,
    Fields, MappingBuilder,
};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::str::FromStr;

pub const GROUP_FIELDS: [&str; 8] = [
    "name", "type", "category", "proxies", "filter", "interval", "strategy", "use",
];

/// A proxy group read leniently: a value of the wrong type leaves its field
/// empty and is kept in `extra`, and an entry that is not a mapping at all is
/// kept in `malformed`. Both are written back unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "Value", into = "Value")]
pub struct ProxyGroup {
    pub name: Option<String>,
    pub group_type: Option<String>,
    pub category: Option<String>,
    pub proxies: Option<Vec<String>>,
    pub filter: Option<String>,
    pub interval: Option<u64>,
    pub strategy: Option<String>,
    pub providers: Option<Vec<String>>,
    // url, tolerance, lazy, icon, ...
    pub extra: serde_yaml::Mapping,
    pub malformed: Option<Value>,
}

impl From<Value> for ProxyGroup {
    fn from(value: Value) -> Self {
        let map = match value {
            Value::Mapping(map) => map,
            other => {
                return Self {
                    malformed: Some(other),
                    ..Default::default()
                }
            }
        };
        let mut fields = Fields::new(map);
        Self {
            name: fields.take("name", as_text),
            group_type: fields.take("type", as_text),
            category: fields.take("category", as_text),
            proxies: fields.take("proxies", as_text_list),
            filter: fields.take("filter", as_text),
            interval: fields.take("interval", |v| {
                as_integer(v).and_then(|i| u64::try_from(i).ok())
            }),
            strategy: fields.take("strategy", as_text),
            providers: fields.take("use", as_text_list),
            extra: fields.into_rest(),
            malformed: None,
        }
    }
}

impl From<ProxyGroup> for Value {
    fn from(group: ProxyGroup) -> Self {
        if let Some(raw) = group.malformed {
            return raw;
        }
        MappingBuilder::new()
            .put("name", group.name.map(text_value))
            .put("type", group.group_type.map(text_value))
            .put("category", group.category.map(text_value))
            .put("proxies", group.proxies.map(text_list_value))
            .put("use", group.providers.map(text_list_value))
            .put("filter", group.filter.map(text_value))
            .put("interval", group.interval.map(number_value))
            .put("strategy", group.strategy.map(text_value))
            .finish(group.extra)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyGroupType {
    Select,
    UrlTest,
    Fallback,
    LoadBalance,
}

impl ProxyGroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyGroupType::Select => "select",
            ProxyGroupType::UrlTest => "url-test",
            ProxyGroupType::Fallback => "fallback",
            ProxyGroupType::LoadBalance => "load-balance",
        }
    }

    /// Whether members are picked by periodic latency tests.
    pub fn is_auto_test(&self) -> bool {
        matches!(self, ProxyGroupType::UrlTest | ProxyGroupType::Fallback)
    }
}

impl FromStr for ProxyGroupType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select" => Ok(Self::Select),
            "url-test" => Ok(Self::UrlTest),
            "fallback" => Ok(Self::Fallback),
            "load-balance" => Ok(Self::LoadBalance),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupCategory {
    Application,
    Region,
}

impl FromStr for GroupCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application" => Ok(Self::Application),
            "region" => Ok(Self::Region),
            _ => Err(()),
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl ProxyGroup {
    pub fn new(name: &str, group_type: ProxyGroupType) -> Self {
        Self {
            name: Some(name.to_string()),
            group_type: Some(group_type.as_str().to_string()),
            ..Default::default()
        }
    }

    /// The group name; an empty string counts as missing.
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    pub fn type_str(&self) -> Option<&str> {
        non_empty(&self.group_type)
    }

    pub fn kind(&self) -> Option<ProxyGroupType> {
        self.type_str().and_then(|t| t.parse().ok())
    }

    pub fn category(&self) -> Option<GroupCategory> {
        non_empty(&self.category).and_then(|c| c.parse().ok())
    }

    pub fn has_members(&self) -> bool {
        self.proxies.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn has_interval(&self) -> bool {
        self.interval.is_some_and(|i| i > 0)
    }

    pub fn has_filter(&self) -> bool {
        non_empty(&self.filter).is_some()
    }

    pub fn has_strategy(&self) -> bool {
        non_empty(&self.strategy).is_some()
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    /// Known fields whose value could not be read.
    pub fn unreadable_fields(&self) -> Vec<&'static str> {
        unreadable(&self.extra, &GROUP_FIELDS)
    }

    /// Display name used in messages, even for unnamed groups.
    pub(crate) fn label(&self) -> String {
        self.name().unwrap_or("undefined").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_accessors() {
        let g: ProxyGroup = serde_yaml::from_str(
            "
name: ''
type: url-test
category: region
interval: 0
filter: '(?i)hk'
url: http://www.gstatic.com/generate_204
",
        )
        .unwrap();
        assert_eq!(g.name(), None);
        assert_eq!(g.label(), "undefined");
        assert_eq!(g.kind(), Some(ProxyGroupType::UrlTest));
        assert!(g.kind().unwrap().is_auto_test());
        assert_eq!(g.category(), Some(GroupCategory::Region));
        assert!(!g.has_interval());
        assert!(g.has_filter());
        assert!(g.extra.contains_key("url"));

        assert!(g.unreadable_fields().is_empty());

        let g = ProxyGroup::new("Proxy", ProxyGroupType::Select);
        assert_eq!(g.type_str(), Some("select"));
        assert!(!g.has_members());
    }

    #[test]
    fn test_wrong_types_are_kept() {
        let g: ProxyGroup = serde_yaml::from_str(
            "{name: 123, type: select, proxies: [1, DIRECT], interval: -5, strategy: [x]}",
        )
        .unwrap();
        assert_eq!(g.name(), Some("123"));
        assert_eq!(
            g.proxies,
            Some(vec!["1".to_string(), "DIRECT".to_string()])
        );
        assert_eq!(g.interval, None);
        assert_eq!(g.strategy, None);
        assert_eq!(g.unreadable_fields(), vec!["interval", "strategy"]);

        let g: ProxyGroup = serde_yaml::from_str("{name: T, interval: '300'}").unwrap();
        assert_eq!(g.interval, Some(300));

        let g: ProxyGroup = serde_yaml::from_str("A").unwrap();
        assert!(g.is_malformed());
        assert_eq!(g.name(), None);
        let text = serde_yaml::to_string(&g).unwrap();
        assert_eq!(text.trim(), "A");

        let mut g: ProxyGroup =
            serde_yaml::from_str("{name: U, type: url-test, interval: -5, lazy: true}").unwrap();
        g.interval = Some(300);
        let back: serde_yaml::Value = serde_yaml::to_value(&g).unwrap();
        let expected: serde_yaml::Value =
            serde_yaml::from_str("{name: U, type: url-test, interval: 300, lazy: true}").unwrap();
        assert_eq!(back, expected);
    }
}
