mod output;

use crate::ProgramArgs;
use clap::{Args, CommandFactory, Subcommand, ValueHint};
use clashapi::{FixAction, FixActionKind, FixSeverity};
use clashlint::config::{load_config, parse_paths, save_config};
use clashlint::fix::{apply_fixes_with, generate_fix_suggestions, SimilarityResolver};
use clashlint::validate::{generate_report, schema::validate_document, validate_config};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub(crate) struct CheckOptions {
    /// Path of configuration. Default to $HOME/.config/clash/config.yaml
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Print the validation result as JSON
    #[arg(long)]
    pub json: bool,
    /// Fail when the document schema lint reports anything
    #[arg(long)]
    pub strict_schema: bool,
}

#[derive(Debug, Args)]
pub(crate) struct SuggestOptions {
    /// Path of configuration. Default to $HOME/.config/clash/config.yaml
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Print the fix actions as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct FixOptions {
    /// Path of configuration. Default to $HOME/.config/clash/config.yaml
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Only apply these actions, e.g. fixRuleTarget
    #[arg(long, value_hint = ValueHint::Other)]
    pub only: Vec<FixActionKind>,
    /// Never apply these actions
    #[arg(long, value_hint = ValueHint::Other)]
    pub skip: Vec<FixActionKind>,
    /// Ignore actions less severe than this (high, medium, low)
    #[arg(long)]
    pub min_severity: Option<FixSeverity>,
    /// Target used when a broken rule target resembles no group
    #[arg(long, value_hint = ValueHint::Other)]
    pub default_target: Option<String>,
    /// Where to write the repaired configuration. Default to stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub(crate) enum PromptOptions {
    Bash,
    Zsh,
    Fish,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SubCommand {
    /// Validate a configuration and print the report
    Check(CheckOptions),
    /// List the fixes available for a configuration
    Suggest(SuggestOptions),
    /// Apply fixes and write the repaired configuration
    Fix(FixOptions),
    /// Generate auto-completion profiles for shells
    #[command(subcommand)]
    Prompt(PromptOptions),
}

impl FixOptions {
    fn selects(&self, action: &FixAction) -> bool {
        (self.only.is_empty() || self.only.contains(&action.action))
            && !self.skip.contains(&action.action)
            && self.min_severity.map_or(true, |s| action.severity <= s)
    }
}

/// Run one subcommand. `Ok(false)` means the configuration did not pass.
pub(crate) fn run(cmd: SubCommand) -> anyhow::Result<bool> {
    match cmd {
        SubCommand::Check(opt) => check(opt),
        SubCommand::Suggest(opt) => suggest(opt),
        SubCommand::Fix(opt) => fix(opt),
        SubCommand::Prompt(shell) => {
            let generator = match shell {
                PromptOptions::Bash => clap_complete::Shell::Bash,
                PromptOptions::Zsh => clap_complete::Shell::Zsh,
                PromptOptions::Fish => clap_complete::Shell::Fish,
            };
            let mut command = ProgramArgs::command();
            let bin_name = command.get_name().to_string();
            clap_complete::generate(generator, &mut command, bin_name, &mut std::io::stdout());
            Ok(true)
        }
    }
}

fn check(opt: CheckOptions) -> anyhow::Result<bool> {
    let path = parse_paths(&opt.config)?;
    let (document, config) = load_config(&path)?;
    let schema = validate_document(&document);
    let result = validate_config(&config);
    if opt.json {
        for msg in &schema {
            tracing::warn!("Schema: {}", msg);
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", generate_report(&result));
        output::print_schema(&schema);
    }
    Ok(result.overall && !(opt.strict_schema && !schema.is_empty()))
}

fn suggest(opt: SuggestOptions) -> anyhow::Result<bool> {
    let path = parse_paths(&opt.config)?;
    let (_, config) = load_config(&path)?;
    let result = validate_config(&config);
    let actions = generate_fix_suggestions(&result, &config);
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&actions)?);
    } else {
        output::print_suggestions(&actions);
    }
    Ok(result.overall)
}

fn fix(opt: FixOptions) -> anyhow::Result<bool> {
    let path = parse_paths(&opt.config)?;
    let (_, config) = load_config(&path)?;
    let actions = generate_fix_suggestions(&validate_config(&config), &config);
    let selected: Vec<FixAction> = actions.into_iter().filter(|a| opt.selects(a)).collect();
    let resolver = match &opt.default_target {
        Some(target) => SimilarityResolver::with_fallback(target.as_str()),
        None => SimilarityResolver::default(),
    };
    let report = apply_fixes_with(&selected, &config, &resolver);
    output::print_outcomes(&selected, &report.results);

    match &opt.output {
        Some(out) => save_config(out, &report.config)?,
        None => print!("{}", serde_yaml::to_string(&report.config)?),
    }
    let after = validate_config(&report.config);
    tracing::info!(
        applied = report.applied(),
        failed = report.failed(),
        overall = after.overall,
        "Fixes applied"
    );
    Ok(after.overall)
}
