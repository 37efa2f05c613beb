use clashapi::{FixAction, FixOutcome, FixSeverity};
use colored::{ColoredString, Colorize};
use tabular::{Row, Table};

fn severity_cell(severity: FixSeverity) -> ColoredString {
    match severity {
        FixSeverity::High => severity.as_str().red().bold(),
        FixSeverity::Medium => severity.as_str().yellow(),
        FixSeverity::Low => severity.as_str().blue(),
    }
}

pub(crate) fn print_suggestions(actions: &[FixAction]) {
    if actions.is_empty() {
        println!("{}", "No fixes needed".green());
        return;
    }
    let mut table = Table::new("{:>} {:<} {:<} {:<} {:<}");
    table.add_row(
        Row::new()
            .with_cell("#")
            .with_cell("Severity")
            .with_cell("Action")
            .with_cell("Tag")
            .with_cell("Description"),
    );
    for (i, action) in actions.iter().enumerate() {
        table.add_row(
            Row::new()
                .with_cell(i + 1)
                .with_cell(severity_cell(action.severity))
                .with_cell(action.action.as_str().cyan())
                .with_cell(&action.tag)
                .with_cell(&action.description),
        );
    }
    println!("{}", table);
}

/// Outcomes go to stderr; stdout may carry the repaired configuration.
pub(crate) fn print_outcomes(actions: &[FixAction], results: &[FixOutcome]) {
    for (action, outcome) in actions.iter().zip(results) {
        let mark = if outcome.success {
            "ok".green()
        } else {
            "failed".red()
        };
        eprintln!("[{}] {}: {}", mark, action.action.as_str().bold(), outcome.message);
    }
}

pub(crate) fn print_schema(messages: &[String]) {
    if messages.is_empty() {
        return;
    }
    println!("## Schema issues");
    for msg in messages {
        println!("{} {}", "!".yellow().bold(), msg);
    }
}
