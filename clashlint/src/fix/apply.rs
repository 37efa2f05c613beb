use crate::config::{
    ClashConfig, FixError, ProxyGroup, ProxyGroupType, RuleEntry, RuleLine, DEFAULT_MATCH_RULE,
};
use crate::fix::{SimilarityResolver, TargetResolver};
use clashapi::{FixAction, FixActionKind, FixData, FixOutcome};

/// The repaired copy of a configuration plus one outcome per selected action.
#[derive(Debug, Clone)]
pub struct FixReport {
    pub config: ClashConfig,
    pub results: Vec<FixOutcome>,
}

impl FixReport {
    pub fn applied(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.applied()
    }
}

pub fn apply_fixes(selected: &[FixAction], config: &ClashConfig) -> FixReport {
    apply_fixes_with(selected, config, &SimilarityResolver::default())
}

/// Apply actions in order to a copy of `config`. A failing action leaves the
/// working copy as it was and does not stop the ones after it.
pub fn apply_fixes_with(
    selected: &[FixAction],
    config: &ClashConfig,
    resolver: &dyn TargetResolver,
) -> FixReport {
    let mut fixed = config.clone();
    let mut results = Vec::with_capacity(selected.len());
    for fix in selected {
        let mut scratch = fixed.clone();
        match apply_one(&mut scratch, fix, resolver) {
            Ok(msg) => {
                tracing::info!(action = %fix.action, "{}", msg);
                fixed = scratch;
                results.push(FixOutcome::ok(msg));
            }
            Err(e) => {
                tracing::warn!(action = %fix.action, "Fix failed: {}", e);
                results.push(FixOutcome::failed(format!("Fix failed: {}", e)));
            }
        }
    }
    FixReport {
        config: fixed,
        results,
    }
}

fn apply_one(
    config: &mut ClashConfig,
    fix: &FixAction,
    resolver: &dyn TargetResolver,
) -> Result<String, FixError> {
    let kind = fix.action;
    match (kind, &fix.data) {
        (FixActionKind::AddProxyGroupName, FixData::ProxyGroup { index, .. }) => {
            let group = group_mut(config, *index)?;
            let name = format!("ProxyGroup{}", index + 1);
            group.name = Some(name.clone());
            Ok(format!("Named proxy group #{} '{}'", index + 1, name))
        }
        (FixActionKind::AddProxyGroupType, FixData::ProxyGroup { index, .. }) => {
            let group = group_mut(config, *index)?;
            group.group_type = Some(ProxyGroupType::Select.as_str().to_string());
            Ok(format!(
                "Set type of proxy group '{}' to select",
                group.label()
            ))
        }
        (FixActionKind::FixDuplicateProxyGroupName, FixData::ProxyGroup { index, .. }) => {
            rename_duplicate(config, *index)
        }
        (FixActionKind::AddProxyGroupInterval, FixData::ProxyGroup { index, .. }) => {
            let group = group_mut(config, *index)?;
            if group.has_interval() {
                return Ok(format!(
                    "Proxy group '{}' already has a test interval",
                    group.label()
                ));
            }
            group.interval = Some(DEFAULT_TEST_INTERVAL);
            Ok(format!(
                "Set test interval of proxy group '{}' to {}",
                group.label(),
                DEFAULT_TEST_INTERVAL
            ))
        }
        (FixActionKind::FixRuleTarget, FixData::Rule { index, literal }) => {
            fix_rule_target(config, *index, literal, resolver)
        }
        (FixActionKind::FixMatchRulePosition, FixData::RuleList) => Ok(move_match_last(config)),
        (FixActionKind::AddMatchRule, FixData::RuleList) => {
            if config.rule_literals().any(|r| RuleLine::parse(r).is_match()) {
                return Ok("MATCH rule already exists".to_string());
            }
            config.rules.push(RuleEntry::from(DEFAULT_MATCH_RULE));
            Ok(format!("Appended '{}'", DEFAULT_MATCH_RULE))
        }
        (
            FixActionKind::AddRuleProviderUrl | FixActionKind::FixRuleProviderUrl,
            FixData::RuleProvider { name },
        ) => {
            if !config.rule_providers.contains_key(name) {
                return Err(FixError::ProviderNotFound(name.clone()));
            }
            Err(FixError::ManualActionRequired(kind))
        }
        (
            FixActionKind::AddProxyGroupProxies | FixActionKind::HandleUnusedProxyGroup,
            FixData::ProxyGroup { index, .. },
        ) => {
            group_mut(config, *index)?;
            Err(FixError::ManualActionRequired(kind))
        }
        (FixActionKind::FixRuleFormat, FixData::Rule { index, literal }) => {
            find_rule(config, *index, literal)?;
            Err(FixError::ManualActionRequired(kind))
        }
        _ => Err(FixError::DataMismatch(kind)),
    }
}

const DEFAULT_TEST_INTERVAL: u64 = 300;

fn group_mut(config: &mut ClashConfig, index: usize) -> Result<&mut ProxyGroup, FixError> {
    config
        .proxy_groups
        .get_mut(index)
        .ok_or(FixError::GroupNotFound(index))
}

/// Position of the rule `literal`, preferring the recorded index. Earlier fixes
/// may have moved rules, so fall back to its first occurrence.
fn find_rule(config: &ClashConfig, index: usize, literal: &str) -> Result<usize, FixError> {
    if config.rules.get(index).and_then(RuleEntry::as_literal) == Some(literal) {
        return Ok(index);
    }
    config
        .rules
        .iter()
        .position(|r| r.as_literal() == Some(literal))
        .ok_or_else(|| FixError::RuleNotFound(literal.to_string()))
}

fn rename_duplicate(config: &mut ClashConfig, index: usize) -> Result<String, FixError> {
    let base = group_mut(config, index)?.label();
    // earlier fixes in the batch may already have made the name unique
    let clashes = config
        .proxy_groups
        .iter()
        .enumerate()
        .any(|(i, g)| i != index && !g.is_malformed() && g.label() == base);
    if !clashes {
        return Ok(format!(
            "Proxy group #{} '{}' is no longer duplicated",
            index + 1,
            base
        ));
    }
    let mut k = 2;
    let renamed = loop {
        let candidate = format!("{} {}", base, k);
        if !config.group_names().any(|n| n == candidate) {
            break candidate;
        }
        k += 1;
    };
    group_mut(config, index)?.name = Some(renamed.clone());
    Ok(format!(
        "Renamed proxy group #{} from '{}' to '{}'",
        index + 1,
        base,
        renamed
    ))
}

fn fix_rule_target(
    config: &mut ClashConfig,
    index: usize,
    literal: &str,
    resolver: &dyn TargetResolver,
) -> Result<String, FixError> {
    let pos = find_rule(config, index, literal)?;
    let line = RuleLine::parse(literal);
    let old = line
        .target()
        .ok_or_else(|| FixError::MissingTarget(literal.to_string()))?;
    let names: Vec<&str> = config.group_names().collect();
    let target = resolver.resolve(old, &names);
    let rebuilt = line
        .with_target(&target)
        .ok_or_else(|| FixError::MissingTarget(literal.to_string()))?;
    config.rules[pos] = RuleEntry::Literal(rebuilt.clone());
    Ok(format!("Rule target '{}' replaced: {}", old, rebuilt))
}

/// Keep the first MATCH rule, drop later ones, and move it to the end.
fn move_match_last(config: &mut ClashConfig) -> String {
    let is_match = |r: &RuleEntry| r.as_literal().is_some_and(|l| RuleLine::parse(l).is_match());
    let Some(first) = config.rules.iter().position(is_match) else {
        return "No MATCH rule to move".to_string();
    };
    let keep = config.rules.remove(first);
    let before = config.rules.len();
    config.rules.retain(|r| !is_match(r));
    let dropped = before - config.rules.len();
    config.rules.push(keep);
    if dropped > 0 {
        format!("Moved MATCH rule to the end, dropped {} extra", dropped)
    } else {
        "Moved MATCH rule to the end".to_string()
    }
}
