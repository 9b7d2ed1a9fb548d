//! Command dispatch and implementations.

use std::io::IsTerminal;

use chrono::{DateTime, Utc};
use clap::CommandFactory;
use serde::Serialize;
use url::Url;

use crate::config::LandingConfig;
use crate::controller::{initialize, LandingController};
use crate::error::{GantryError, Result};
use crate::evaluator::{ReadinessEvaluator, ReadinessSnapshot};
use crate::launch::{LaunchGate, LaunchOutcome};
use crate::page::{audit_document, render_landing_document, AuditSeverity};
use crate::probes::HostEnvironment;
use crate::registry::DependencyRegistry;
use crate::ui::{
    GantryTheme, OutputMode, StatusGlyph, StatusPresenter, TerminalPresenter, TerminalPrompter,
};

use super::args::{AuditArgs, CheckArgs, Cli, Commands, CompletionsArgs, LaunchArgs, PageArgs};

/// Result of running a command.
#[derive(Debug, Clone, Copy)]
pub struct CommandResult {
    /// Process exit code.
    pub exit_code: u8,
}

impl CommandResult {
    fn success() -> Self {
        Self { exit_code: 0 }
    }

    fn failure() -> Self {
        Self { exit_code: 1 }
    }

    fn from_pass(pass: bool) -> Self {
        if pass {
            Self::success()
        } else {
            Self::failure()
        }
    }
}

/// Dispatches parsed CLI arguments to command implementations.
pub struct CommandDispatcher;

impl CommandDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Run the selected command. `check` is the default.
    pub fn dispatch(&self, cli: &Cli) -> Result<CommandResult> {
        match &cli.command {
            None => run_check(cli, &CheckArgs::default()),
            Some(Commands::Check(args)) => run_check(cli, args),
            Some(Commands::Launch(args)) => run_launch(cli, args),
            Some(Commands::Page(args)) => run_page(cli, args),
            Some(Commands::Audit(args)) => run_audit(cli, args),
            Some(Commands::Completions(args)) => run_completions(args),
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    }
}

/// Whether prompts may be shown.
fn is_interactive() -> bool {
    std::env::var_os("CI").is_none()
        && std::io::stdin().is_terminal()
        && std::io::stdout().is_terminal()
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| GantryError::InvalidOrigin {
        origin: raw.to_string(),
        message: err.to_string(),
    })
}

/// Build the landing flow shared by `check` and `launch`.
fn build_controller(
    cli: &Cli,
    origin_override: Option<&str>,
    presenter: Box<dyn StatusPresenter>,
) -> Result<LandingController> {
    let config = LandingConfig::load(cli.config.as_deref())?;
    let origin = match origin_override {
        Some(raw) => parse_url(raw)?,
        None => config.origin_url()?,
    };
    let env = HostEnvironment::detect(origin);
    let evaluator = ReadinessEvaluator::new(DependencyRegistry::standard(), env);
    Ok(initialize(config, evaluator, LaunchGate::new(), presenter))
}

/// Readiness report emitted by `check --json`.
#[derive(Serialize)]
struct CheckReport<'a> {
    checked_at: DateTime<Utc>,
    settled: bool,
    app_state: &'a str,
    snapshot: &'a ReadinessSnapshot,
}

fn run_check(cli: &Cli, args: &CheckArgs) -> Result<CommandResult> {
    let mode = if args.json {
        OutputMode::Quiet
    } else {
        output_mode(cli)
    };
    let interactive = !args.json && !args.non_interactive && is_interactive();
    let presenter = TerminalPresenter::new(GantryTheme::auto(), mode, interactive);
    let mut controller = build_controller(cli, args.origin.as_deref(), Box::new(presenter))?;

    controller.bootstrap();
    let settled = controller.settle(std::time::Duration::from_secs(args.timeout));

    if args.json {
        let report = CheckReport {
            checked_at: Utc::now(),
            settled,
            app_state: controller.app_state().as_str(),
            snapshot: controller.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(CommandResult::from_pass(controller.snapshot().all_pass()));
    }

    if interactive {
        let mut prompter = TerminalPrompter::new();
        controller.run_interactive(
            &mut prompter,
            std::time::Duration::from_secs(args.timeout),
        )?;
    }

    Ok(CommandResult::from_pass(controller.snapshot().all_pass()))
}

fn run_launch(cli: &Cli, args: &LaunchArgs) -> Result<CommandResult> {
    let mode = if args.json {
        OutputMode::Quiet
    } else {
        output_mode(cli)
    };
    let presenter = TerminalPresenter::new(GantryTheme::auto(), mode, false);
    let mut controller = build_controller(cli, args.origin.as_deref(), Box::new(presenter))?;

    controller.bootstrap();
    controller.settle(std::time::Duration::from_secs(args.timeout));

    let base = args.base.as_deref().map(parse_url).transpose()?;
    let outcome = controller.launch(base)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    Ok(CommandResult::from_pass(matches!(
        outcome,
        LaunchOutcome::Proceed { .. }
    )))
}

fn run_page(cli: &Cli, args: &PageArgs) -> Result<CommandResult> {
    let config = LandingConfig::load(cli.config.as_deref())?;
    let document = render_landing_document(&config, &DependencyRegistry::standard());
    match &args.out {
        Some(path) => {
            std::fs::write(path, &document)?;
            tracing::debug!("wrote landing document to {}", path.display());
        }
        None => print!("{}", document),
    }
    Ok(CommandResult::success())
}

fn run_audit(cli: &Cli, args: &AuditArgs) -> Result<CommandResult> {
    let config = LandingConfig::load(cli.config.as_deref())?;
    let html = std::fs::read_to_string(&args.file).map_err(|err| {
        GantryError::AuditTargetUnreadable {
            path: args.file.clone(),
            message: err.to_string(),
        }
    })?;

    let report = audit_document(&html, &config);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            let theme = GantryTheme::auto();
            if report.findings().is_empty() {
                println!(
                    "{}",
                    theme.format_success(&format!("{} satisfies the landing contract", args.file.display()))
                );
            }
            for finding in report.findings() {
                let glyph = match finding.severity {
                    AuditSeverity::Error => StatusGlyph::Fail,
                    AuditSeverity::Warning => StatusGlyph::Blocked,
                };
                println!("{}", glyph.format(&theme, &finding.message));
            }
        }
    }

    let failed = !report.is_clean() || (args.strict && report.warning_count() > 0);
    Ok(CommandResult::from_pass(!failed))
}

fn run_completions(args: &CompletionsArgs) -> Result<CommandResult> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "gantry", &mut std::io::stdout());
    Ok(CommandResult::success())
}
