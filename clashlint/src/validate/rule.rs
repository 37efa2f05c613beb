use crate::config::{
    is_builtin_target, GroupCategory, ProxyGroup, RuleEntry, RuleLine, RuleType,
};
use clashapi::{Issue, IssueKind, Subject};
use std::collections::HashSet;

fn rule_subject(index: usize, literal: Option<&str>) -> Subject {
    Subject::Rule {
        index,
        literal: literal.map(str::to_string),
    }
}

/// Per-rule syntax: string-ness, field count, type, content and target.
pub fn check_rule_syntax(rules: &[RuleEntry]) -> Vec<Issue> {
    let mut issues = vec![];
    for (index, entry) in rules.iter().enumerate() {
        let Some(literal) = entry.as_literal() else {
            issues.push(Issue::new(
                IssueKind::RuleNotString { index },
                rule_subject(index, None),
            ));
            continue;
        };
        let line = RuleLine::parse(literal);
        let subject = || rule_subject(index, Some(literal));
        if line.len() < 2 {
            issues.push(Issue::new(
                IssueKind::RuleMalformed {
                    index,
                    rule: literal.to_string(),
                },
                subject(),
            ));
            continue;
        }
        if line.kind().is_none() {
            issues.push(Issue::new(
                IssueKind::UnsupportedRuleType {
                    index,
                    rule_type: line.rule_type().to_string(),
                },
                subject(),
            ));
        }
        if line.content().is_none() {
            issues.push(Issue::new(IssueKind::EmptyRuleContent { index }, subject()));
        }
        // MATCH carries its target in the second field
        if line.target().is_none() && line.kind() != Some(RuleType::Match) {
            issues.push(Issue::new(IssueKind::EmptyRuleTarget { index }, subject()));
        }
    }
    issues
}

/// Rule targets against the declared groups, then application groups no rule routes to.
pub fn check_rule_targets(rules: &[RuleEntry], groups: &[ProxyGroup]) -> Vec<Issue> {
    let mut issues = vec![];
    let group_names: HashSet<&str> = groups.iter().filter_map(ProxyGroup::name).collect();
    let mut used: HashSet<&str> = HashSet::new();

    for (index, entry) in rules.iter().enumerate() {
        let Some(literal) = entry.as_literal() else {
            continue;
        };
        let line = RuleLine::parse(literal);
        if line.len() < 3 {
            continue;
        }
        // empty targets are reported by the syntax check
        let Some(target) = line.target() else {
            continue;
        };
        used.insert(target);
        if !is_builtin_target(target) && !group_names.contains(target) {
            issues.push(Issue::new(
                IssueKind::TargetNotFound {
                    index,
                    target: target.to_string(),
                },
                rule_subject(index, Some(literal)),
            ));
        }
    }

    for (index, group) in groups.iter().enumerate() {
        let Some(name) = group.name() else {
            continue;
        };
        if group.category() == Some(GroupCategory::Application) && !used.contains(name) {
            issues.push(Issue::new(
                IssueKind::UnusedGroup {
                    name: name.to_string(),
                },
                Subject::ProxyGroup {
                    index,
                    name: Some(name.to_string()),
                },
            ));
        }
    }
    issues
}

/// MATCH must appear once, as the last rule. An empty rule list needs no catch-all.
pub fn check_rule_priority(rules: &[RuleEntry]) -> Vec<Issue> {
    let mut issues = vec![];
    let mut first_match: Option<usize> = None;

    for (index, entry) in rules.iter().enumerate() {
        let Some(literal) = entry.as_literal() else {
            continue;
        };
        let line = RuleLine::parse(literal);
        if line.is_match() {
            if first_match.is_some() {
                issues.push(Issue::new(
                    IssueKind::MultipleMatch { index },
                    rule_subject(index, Some(literal)),
                ));
            } else {
                first_match = Some(index);
            }
        }
        if first_match.is_some_and(|m| index > m) {
            issues.push(Issue::new(
                IssueKind::RuleAfterMatch { index },
                rule_subject(index, Some(literal)),
            ));
        }
    }

    if first_match.is_none() && !rules.is_empty() {
        issues.push(Issue::new(IssueKind::MissingMatch, Subject::RuleList));
    }
    issues
}
