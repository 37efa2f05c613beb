use crate::config::{GroupCategory, ProxyGroup, ProxyGroupType};
use clashapi::{Issue, IssueKind, Subject};
use std::collections::HashSet;

fn subject(index: usize, group: &ProxyGroup) -> Subject {
    Subject::ProxyGroup {
        index,
        name: group.name().map(str::to_string),
    }
}

/// Structural check of every proxy group, in declaration order.
pub fn check_proxy_groups(groups: &[ProxyGroup]) -> Vec<Issue> {
    let mut issues = vec![];
    let mut seen: HashSet<Option<&str>> = HashSet::new();

    for (index, group) in groups.iter().enumerate() {
        if group.is_malformed() {
            issues.push(Issue::new(
                IssueKind::GroupNotMapping { index },
                subject(index, group),
            ));
            continue;
        }
        let label = group.label();
        let mut push = |kind| issues.push(Issue::new(kind, subject(index, group)));

        if group.name().is_none() {
            push(IssueKind::GroupMissingName { index });
        }
        if group.type_str().is_none() {
            push(IssueKind::GroupMissingType {
                name: label.clone(),
            });
        }
        // only the later occurrence is reported
        if !seen.insert(group.name()) {
            push(IssueKind::GroupDuplicateName {
                name: label.clone(),
            });
        }

        for field in group.unreadable_fields() {
            push(IssueKind::GroupFieldUnreadable {
                name: label.clone(),
                field: field.to_string(),
            });
        }

        match group.kind() {
            Some(ProxyGroupType::Select) if !group.has_members() => {
                push(IssueKind::SelectWithoutProxies {
                    name: label.clone(),
                });
            }
            Some(t) if t.is_auto_test() && !group.has_interval() => {
                push(IssueKind::MissingTestInterval {
                    name: label.clone(),
                    group_type: t.as_str().to_string(),
                });
            }
            Some(ProxyGroupType::LoadBalance) if !group.has_strategy() => {
                push(IssueKind::MissingStrategy {
                    name: label.clone(),
                });
            }
            _ => {}
        }

        if group.category() == Some(GroupCategory::Region) && !group.has_filter() {
            push(IssueKind::RegionWithoutFilter { name: label });
        }
    }
    tracing::debug!(
        groups = groups.len(),
        issues = issues.len(),
        "Proxy groups checked"
    );
    issues
}
