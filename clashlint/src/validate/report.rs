use clashapi::{Issue, IssueLevel, ValidationResult};
use std::fmt::Write;

fn icon(level: IssueLevel) -> &'static str {
    match level {
        IssueLevel::Error => "❌",
        IssueLevel::Warning => "⚠️",
        IssueLevel::Info => "ℹ️",
    }
}

fn write_section(report: &mut String, title: &str, issues: &[Issue]) {
    if issues.is_empty() {
        return;
    }
    let _ = writeln!(report, "## {}", title);
    for issue in issues {
        let _ = writeln!(report, "{} {}", icon(issue.level), issue.message);
        if let Some(suggestion) = &issue.suggestion {
            let _ = writeln!(report, "   💡 {}", suggestion);
        }
        report.push('\n');
    }
}

/// Render a validation result as a human-readable markdown summary.
pub fn generate_report(result: &ValidationResult) -> String {
    let mut report = String::from("# Configuration Validation Report\n\n");
    if result.overall {
        report.push_str("✅ **Configuration passed validation**\n\n");
    } else {
        report.push_str("❌ **Configuration failed validation, serious problems found**\n\n");
    }
    write_section(&mut report, "Proxy group issues", &result.proxy_groups);
    write_section(&mut report, "Rule issues", &result.rules);
    write_section(&mut report, "Rule provider issues", &result.rule_providers);
    if result.is_clean() {
        report.push_str("🎉 **Congratulations! The configuration is fully correct, no issues found.**\n");
    }
    report
}
