use crate::config::{ProxyGroup, RuleEntry, RuleProvider};
use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// A Clash configuration as seen by the checker. General and DNS settings are
/// carried in `rest` untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ClashConfig {
    #[serde(flatten)]
    pub rest: serde_yaml::Mapping,
    #[serde(
        alias = "proxy-group",
        rename = "proxy-groups",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub proxy_groups: Vec<ProxyGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleEntry>,
    #[serde(
        alias = "rule-provider",
        rename = "rule-providers",
        default = "default_rule_provider",
        skip_serializing_if = "LinkedHashMap::is_empty"
    )]
    pub rule_providers: LinkedHashMap<String, RuleProvider>,
}

pub(crate) fn default_rule_provider() -> LinkedHashMap<String, RuleProvider> {
    Default::default()
}

impl ClashConfig {
    /// Names of all named proxy groups, in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.proxy_groups.iter().filter_map(|g| g.name())
    }

    pub fn rule_literals(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().filter_map(RuleEntry::as_literal)
    }
}

#[test]
fn test_config_keeps_unknown_sections() {
    let config = "
mode: rule
log-level: info
dns:
  enable: true
proxy-groups:
  - name: Proxy
    type: select
    proxies: [DIRECT]
    icon: proxy.png
rules:
  - MATCH,Proxy
  - 42
rule-providers:
  b:
    url: https://example.com/b.yaml
  a:
    url: https://example.com/a.yaml
";
    let cfg: ClashConfig = serde_yaml::from_str(config).unwrap();
    assert_eq!(cfg.proxy_groups.len(), 1);
    assert_eq!(cfg.group_names().collect::<Vec<_>>(), vec!["Proxy"]);
    assert!(cfg.proxy_groups[0].extra.contains_key("icon"));
    assert_eq!(cfg.rules.len(), 2);
    assert!(cfg.rules[1].as_literal().is_none());
    assert_eq!(
        cfg.rule_providers.keys().cloned().collect::<Vec<_>>(),
        vec!["b".to_string(), "a".to_string()]
    );
    assert!(cfg.rest.contains_key("dns"));
    assert!(!cfg.rest.contains_key("rules"));

    let text = serde_yaml::to_string(&cfg).unwrap();
    let again: ClashConfig = serde_yaml::from_str(&text).unwrap();
    assert_eq!(again, cfg);
}
