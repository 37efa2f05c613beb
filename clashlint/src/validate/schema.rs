use crate::validate::field::{validate_field, FieldFormat, FieldRule, FieldType};
use serde_yaml::Value;

fn general_rules() -> Vec<(&'static str, FieldRule)> {
    vec![
        (
            "mode",
            FieldRule::of(FieldType::String)
                .required()
                .one_of(&["rule", "global", "direct"])
                .message("mode must be rule, global or direct"),
        ),
        (
            "log-level",
            FieldRule::of(FieldType::String)
                .required()
                .one_of(&["info", "warning", "error", "debug", "silent"])
                .message("log level must be a valid value"),
        ),
        (
            "port",
            FieldRule::of(FieldType::Number)
                .range(Some(1.0), Some(65535.0))
                .message("HTTP port must be within 1-65535"),
        ),
        (
            "socks-port",
            FieldRule::of(FieldType::Number)
                .range(Some(1.0), Some(65535.0))
                .message("SOCKS port must be within 1-65535"),
        ),
    ]
}

fn dns_rules() -> Vec<(&'static str, FieldRule)> {
    ["default-nameserver", "nameserver", "fake-ip-filter"]
        .into_iter()
        .map(|key| {
            (
                key,
                FieldRule::of(FieldType::Array)
                    .items(FieldType::String)
                    .message("must be an array of strings"),
            )
        })
        .collect()
}

fn proxy_provider_rules() -> Vec<(&'static str, FieldRule)> {
    vec![
        (
            "url",
            FieldRule::of(FieldType::String)
                .required()
                .format(FieldFormat::Url)
                .message("subscription link must be a valid URL"),
        ),
        (
            "interval",
            FieldRule::of(FieldType::Number)
                .range(Some(60.0), None)
                .message("update interval must be at least 60 seconds"),
        ),
        (
            "benchmark-url",
            FieldRule::of(FieldType::String)
                .format(FieldFormat::Url)
                .message("benchmark URL must be a valid URL"),
        ),
        (
            "benchmark-timeout",
            FieldRule::of(FieldType::Number)
                .range(Some(1.0), Some(30.0))
                .message("benchmark timeout must be within 1-30 seconds"),
        ),
    ]
}

fn proxy_group_rules() -> Vec<(&'static str, FieldRule)> {
    vec![
        (
            "name",
            FieldRule::of(FieldType::String)
                .required()
                .length(Some(1), None)
                .message("proxy group name must not be empty"),
        ),
        (
            "type",
            FieldRule::of(FieldType::String)
                .required()
                .one_of(&["select", "url-test", "fallback", "load-balance"])
                .message("proxy group type must be a valid value"),
        ),
        (
            "proxies",
            FieldRule::of(FieldType::Array)
                .items(FieldType::String)
                .message("proxies must be an array of strings"),
        ),
        (
            "use",
            FieldRule::of(FieldType::Array)
                .items(FieldType::String)
                .message("used providers must be an array of strings"),
        ),
        (
            "filter",
            FieldRule::of(FieldType::String)
                .format(FieldFormat::Regex)
                .message("filter must be a valid regular expression"),
        ),
        (
            "interval",
            FieldRule::of(FieldType::Number)
                .range(Some(60.0), None)
                .message("test interval must be at least 60 seconds"),
        ),
        (
            "strategy",
            FieldRule::of(FieldType::String)
                .one_of(&["consistent-hashing", "round-robin"])
                .message("load-balance strategy must be a valid value"),
        ),
    ]
}

fn check_section(
    prefix: &str,
    section: &Value,
    rules: &[(&'static str, FieldRule)],
    errors: &mut Vec<String>,
) {
    for (key, rule) in rules {
        let name = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };
        if let Err(e) = validate_field(&name, section.get(*key), rule) {
            errors.push(e.to_string());
        }
    }
}

/// Field-level lint of a whole configuration document. Every finding is an
/// error message naming the offending field path.
pub fn validate_document(document: &Value) -> Vec<String> {
    let mut errors = vec![];
    check_section("", document, &general_rules(), &mut errors);

    if let Some(dns) = document.get("dns").filter(|d| d.is_mapping()) {
        check_section("dns", dns, &dns_rules(), &mut errors);
    }

    if let Some(providers) = document.get("proxy-providers").and_then(Value::as_mapping) {
        let rules = proxy_provider_rules();
        for (name, provider) in providers {
            let name = scalar_label(name);
            check_section(&format!("proxy-providers.{}", name), provider, &rules, &mut errors);
        }
    }

    if let Some(groups) = document.get("proxy-groups").and_then(Value::as_sequence) {
        let rules = proxy_group_rules();
        for (idx, group) in groups.iter().enumerate() {
            check_section(&format!("proxy-groups[{}]", idx), group, &rules, &mut errors);
        }
    }

    errors.extend(check_port_conflicts(document));
    tracing::debug!(errors = errors.len(), "Document schema checked");
    errors
}

fn check_port_conflicts(document: &Value) -> Option<String> {
    let ports: Vec<u64> = ["port", "socks-port"]
        .iter()
        .filter_map(|k| document.get(*k).and_then(Value::as_u64))
        .filter(|p| *p != 0)
        .collect();
    let mut duplicates: Vec<String> = ports
        .iter()
        .enumerate()
        .filter(|(idx, p)| ports.iter().position(|q| q == *p) != Some(*idx))
        .map(|(_, p)| p.to_string())
        .collect();
    duplicates.dedup();
    if duplicates.is_empty() {
        None
    } else {
        Some(format!(
            "port conflict: {} used more than once",
            duplicates.join(", ")
        ))
    }
}

fn scalar_label(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document() {
        let doc: Value = serde_yaml::from_str(
            "
mode: rule
log-level: info
port: 7890
socks-port: 7891
dns:
  nameserver: [223.5.5.5, 'https://doh.pub/dns-query']
proxy-providers:
  sub:
    url: https://example.com/sub
    interval: 3600
proxy-groups:
  - name: Proxy
    type: select
    proxies: [DIRECT]
  - name: HK
    type: url-test
    filter: '(?i)hk'
    interval: 300
",
        )
        .unwrap();
        assert_eq!(validate_document(&doc), Vec::<String>::new());
    }

    #[test]
    fn test_document_errors() {
        let doc: Value = serde_yaml::from_str(
            "
mode: script
port: 7890
socks-port: 7890
dns:
  nameserver: [1, 2]
proxy-providers:
  sub:
    interval: 10
proxy-groups:
  - name: LB
    type: load-balance
    strategy: random
    filter: '(broken'
",
        )
        .unwrap();
        let errors = validate_document(&doc);
        assert_eq!(
            errors,
            vec![
                "mode: value must be one of rule, global, direct".to_string(),
                "log-level: field is required".to_string(),
                "dns.nameserver[0]: array item has wrong type".to_string(),
                "proxy-providers.sub.url: field is required".to_string(),
                "proxy-providers.sub.interval: value must not be less than 60".to_string(),
                "proxy-groups[0].filter: regular expression format incorrect".to_string(),
                "proxy-groups[0].strategy: value must be one of consistent-hashing, round-robin"
                    .to_string(),
                "port conflict: 7890 used more than once".to_string(),
            ]
        );
    }
}
