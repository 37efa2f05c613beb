use crate::config::coerce::{
    as_integer, as_text, number_value, text_value, unreadable, Fields, MappingBuilder,
};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::str::FromStr;

/// Accepted update interval of a rule provider, in seconds.
pub const PROVIDER_INTERVAL_RANGE: std::ops::RangeInclusive<i64> = 60..=604800;

pub const PROVIDER_FIELDS: [&str; 4] = ["url", "behavior", "format", "interval"];

/// Read leniently, like `ProxyGroup`: unusable values stay in `extra`, and a
/// provider that is not a mapping is kept in `malformed`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "Value", into = "Value")]
pub struct RuleProvider {
    pub url: Option<String>,
    pub behavior: Option<String>,
    pub format: Option<String>,
    pub interval: Option<i64>,
    // type, path, ...
    pub extra: serde_yaml::Mapping,
    pub malformed: Option<Value>,
}

impl From<Value> for RuleProvider {
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
            url: fields.take("url", as_text),
            behavior: fields.take("behavior", as_text),
            format: fields.take("format", as_text),
            interval: fields.take("interval", as_integer),
            extra: fields.into_rest(),
            malformed: None,
        }
    }
}

impl From<RuleProvider> for Value {
    fn from(provider: RuleProvider) -> Self {
        if let Some(raw) = provider.malformed {
            return raw;
        }
        MappingBuilder::new()
            .put("url", provider.url.map(text_value))
            .put("behavior", provider.behavior.map(text_value))
            .put("format", provider.format.map(text_value))
            .put("interval", provider.interval.map(number_value))
            .finish(provider.extra)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderBehavior {
    Domain,
    IpCidr,
    Classical,
}

impl FromStr for ProviderBehavior {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domain" => Ok(Self::Domain),
            "ipcidr" => Ok(Self::IpCidr),
            "classical" => Ok(Self::Classical),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFormat {
    Text,
    Yaml,
}

impl FromStr for ProviderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "yaml" => Ok(Self::Yaml),
            _ => Err(()),
        }
    }
}

impl RuleProvider {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    pub fn behavior(&self) -> Option<&str> {
        self.behavior.as_deref().filter(|b| !b.is_empty())
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref().filter(|f| !f.is_empty())
    }

    /// The configured interval, with zero treated as unset.
    pub fn interval(&self) -> Option<i64> {
        self.interval.filter(|i| *i != 0)
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    pub fn unreadable_fields(&self) -> Vec<&'static str> {
        unreadable(&self.extra, &PROVIDER_FIELDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_provider() {
        let p: RuleProvider =
            serde_yaml::from_str("{url: 'https://a/b', interval: 3600.5, type: http}").unwrap();
        assert_eq!(p.url(), Some("https://a/b"));
        assert_eq!(p.interval(), None);
        assert_eq!(p.unreadable_fields(), vec!["interval"]);
        assert!(p.extra.contains_key("type"));

        let p: RuleProvider = serde_yaml::from_str("{interval: '86400'}").unwrap();
        assert_eq!(p.interval(), Some(86400));
        assert_eq!(p.url(), None);

        let p: RuleProvider = serde_yaml::from_str("5").unwrap();
        assert!(p.is_malformed());
        assert_eq!(serde_yaml::to_string(&p).unwrap().trim(), "5");
    }
}
