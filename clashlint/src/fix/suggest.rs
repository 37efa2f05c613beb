use crate::config::ClashConfig;
use clashapi::{FixAction, FixActionKind, FixData, Issue, IssueKind, Subject, ValidationResult};

fn action_for(kind: &IssueKind) -> Option<FixActionKind> {
    let action = match kind {
        IssueKind::GroupMissingName { .. } => FixActionKind::AddProxyGroupName,
        IssueKind::GroupMissingType { .. } => FixActionKind::AddProxyGroupType,
        IssueKind::GroupDuplicateName { .. } => FixActionKind::FixDuplicateProxyGroupName,
        IssueKind::SelectWithoutProxies { .. } => FixActionKind::AddProxyGroupProxies,
        IssueKind::MissingTestInterval { .. } => FixActionKind::AddProxyGroupInterval,
        IssueKind::TargetNotFound { .. } => FixActionKind::FixRuleTarget,
        IssueKind::RuleMalformed { .. } => FixActionKind::FixRuleFormat,
        IssueKind::MultipleMatch { .. } | IssueKind::RuleAfterMatch { .. } => {
            FixActionKind::FixMatchRulePosition
        }
        IssueKind::MissingMatch => FixActionKind::AddMatchRule,
        IssueKind::UnusedGroup { .. } => FixActionKind::HandleUnusedProxyGroup,
        IssueKind::ProviderMissingUrl { .. } => FixActionKind::AddRuleProviderUrl,
        IssueKind::ProviderBadUrl { .. } => FixActionKind::FixRuleProviderUrl,
        _ => return None,
    };
    Some(action)
}

fn data_for(action: FixActionKind, issue: &Issue) -> Option<FixData> {
    if action == FixActionKind::FixMatchRulePosition {
        return Some(FixData::RuleList);
    }
    match &issue.subject {
        Subject::ProxyGroup { index, name } => Some(FixData::ProxyGroup {
            index: *index,
            name: name.clone(),
        }),
        Subject::Rule {
            index,
            literal: Some(literal),
        } => Some(FixData::Rule {
            index: *index,
            literal: literal.clone(),
        }),
        Subject::Rule { literal: None, .. } => None,
        Subject::RuleProvider { name } => Some(FixData::RuleProvider { name: name.clone() }),
        Subject::RuleList => Some(FixData::RuleList),
    }
}

/// Whether the subject is still present in the snapshot the fixes will run on.
fn subject_present(data: &FixData, config: &ClashConfig) -> bool {
    match data {
        FixData::ProxyGroup { index, .. } => *index < config.proxy_groups.len(),
        FixData::Rule { index, literal } => config
            .rules
            .get(*index)
            .and_then(|r| r.as_literal())
            .is_some_and(|r| r == literal),
        FixData::RuleList => true,
        FixData::RuleProvider { name } => config.rule_providers.contains_key(name),
    }
}

/// Derive repair actions from a validation result, in bucket order: proxy
/// groups, rules, rule providers. Misplaced MATCH findings collapse into one action.
pub fn generate_fix_suggestions(result: &ValidationResult, config: &ClashConfig) -> Vec<FixAction> {
    let mut actions: Vec<FixAction> = vec![];
    for issue in result.iter() {
        let Some(action) = action_for(&issue.kind) else {
            continue;
        };
        if action == FixActionKind::FixMatchRulePosition
            && actions.iter().any(|a| a.action == action)
        {
            continue;
        }
        let Some(data) = data_for(action, issue) else {
            continue;
        };
        if !subject_present(&data, config) {
            tracing::debug!(%action, "Skip suggestion for a subject missing from the snapshot");
            continue;
        }
        actions.push(FixAction::new(action, data));
    }
    tracing::debug!(actions = actions.len(), "Fix suggestions generated");
    actions
}
