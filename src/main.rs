use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use recentsguard::apps::{AppCatalogScanner, ScanResults, ScanTask, SectionIndex, SnapshotRegistry};
use recentsguard::cli::args::{Cli, Commands, CompletionShell, ConfigAction, OutputFormat};
use recentsguard::cli::output;
use recentsguard::common::config::{self, Config};
use recentsguard::common::logging;
use recentsguard::privacy::PrivacyToggleService;
use recentsguard::settings::FileSettingsStore;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Config and completions must run even when config.toml is broken.
    match cli.command {
        Commands::Config { ref action } => {
            let _log_guard = logging::init_logging(cli.verbose, &Config::default())?;
            return cmd_config(action);
        }
        Commands::Completions { ref shell } => return cmd_completions(shell),
        _ => {}
    }

    let config = Config::load()?;
    let _log_guard = logging::init_logging(cli.verbose, &config)?;
    let format = resolve_format(&cli, &config);

    match cli.command {
        Commands::List { detailed } => cmd_list(&cli, &config, &format, detailed),
        Commands::Sections => cmd_sections(&cli, &config, &format),
        Commands::Hide { ref package } => cmd_set(&cli, &config, &format, package, true),
        Commands::Show { ref package } => cmd_set(&cli, &config, &format, package, false),
        Commands::Toggle { ref package } => cmd_toggle(&cli, &config, &format, package),
        Commands::Status { ref package } => cmd_status(&cli, &config, &format, package),
        Commands::Reset { yes } => cmd_reset(&cli, &config, yes),
        Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}

fn cmd_completions(shell: &CompletionShell) -> Result<()> {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => clap_complete::Shell::Bash,
        CompletionShell::Zsh => clap_complete::Shell::Zsh,
        CompletionShell::Fish => clap_complete::Shell::Fish,
    };
    clap_complete::generate(shell, &mut cmd, "recentsguard", &mut std::io::stdout());
    Ok(())
}

fn resolve_format(cli: &Cli, config: &Config) -> OutputFormat {
    match (&cli.format, &config.output_format) {
        (Some(format), _) => format.clone(),
        (None, config::OutputFormat::Human) => OutputFormat::Human,
        (None, config::OutputFormat::Json) => OutputFormat::Json,
        (None, config::OutputFormat::Quiet) => OutputFormat::Quiet,
    }
}

// ─── Wiring ───────────────────────────────────────────────────────────────────

fn open_privacy(cli: &Cli, config: &Config) -> PrivacyToggleService {
    let path = cli.store.clone().unwrap_or_else(|| config.store_file());
    PrivacyToggleService::new(Arc::new(FileSettingsStore::new(path)), config.settings_key.clone())
}

fn open_scanner(cli: &Cli, config: &Config) -> Result<AppCatalogScanner> {
    let path = cli.registry.clone().unwrap_or_else(|| config.registry_file());
    let registry = SnapshotRegistry::load(&path)
        .context("Cannot read device snapshot (pass --registry or set registry_path)")?;
    Ok(AppCatalogScanner::new(Arc::new(registry), open_privacy(cli, config)))
}

fn run_scan(cli: &Cli, config: &Config, format: &OutputFormat) -> Result<ScanResults> {
    let scanner = open_scanner(cli, config)?;
    let task = ScanTask::spawn(scanner);

    let pb = if !cli.quiet && matches!(format, OutputFormat::Human) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Loading installed apps...");
        Some(pb)
    } else {
        None
    };

    let outcome = task.wait_with(Duration::from_millis(80), || {
        if let Some(ref pb) = pb {
            pb.tick();
        }
    });

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match outcome {
        Some(result) => Ok(result?),
        None => anyhow::bail!("App scan did not complete"),
    }
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn cmd_list(cli: &Cli, config: &Config, format: &OutputFormat, detailed: bool) -> Result<()> {
    let results = run_scan(cli, config, format)?;
    let index = SectionIndex::build(&results.entries);

    match format {
        OutputFormat::Human => output::print_app_list(&results, detailed),
        OutputFormat::Json => output::print_scan_json(&results, &index),
        OutputFormat::Quiet => output::print_scan_quiet(&results),
    }
    Ok(())
}

fn cmd_sections(cli: &Cli, config: &Config, format: &OutputFormat) -> Result<()> {
    let results = run_scan(cli, config, format)?;
    let index = SectionIndex::build(&results.entries);

    match format {
        OutputFormat::Human => output::print_sections(&index),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&index)?),
        OutputFormat::Quiet => {
            for section in index.sections() {
                println!("{}\t{}", section.label, section.first_offset);
            }
        }
    }
    Ok(())
}

// ─── Toggle ───────────────────────────────────────────────────────────────────

fn print_state(format: &OutputFormat, package: &str, requested: bool, state: bool) -> Result<()> {
    match format {
        OutputFormat::Human => output::print_toggle_result(package, requested, state),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "package": package,
                "requested": requested,
                "hidden": state,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => println!("{}", state),
    }
    Ok(())
}

fn cmd_set(cli: &Cli, config: &Config, format: &OutputFormat, package: &str, enabled: bool) -> Result<()> {
    let privacy = open_privacy(cli, config);
    let state = privacy.set_enabled(package, enabled)?;
    print_state(format, package, enabled, state)
}

fn cmd_toggle(cli: &Cli, config: &Config, format: &OutputFormat, package: &str) -> Result<()> {
    let privacy = open_privacy(cli, config);
    let requested = !privacy.is_enabled(package)?;
    let state = privacy.set_enabled(package, requested)?;
    print_state(format, package, requested, state)
}

fn cmd_status(cli: &Cli, config: &Config, format: &OutputFormat, package: &str) -> Result<()> {
    let privacy = open_privacy(cli, config);
    let hidden = privacy.is_enabled(package)?;

    match format {
        OutputFormat::Human => println!(
            "  {} {}",
            package.bold(),
            recentsguard::common::format::format_hidden(hidden)
        ),
        OutputFormat::Json => {
            let json = serde_json::json!({ "package": package, "hidden": hidden });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Quiet => println!("{}", hidden),
    }
    Ok(())
}

// ─── Reset ────────────────────────────────────────────────────────────────────

fn cmd_reset(cli: &Cli, config: &Config, yes: bool) -> Result<()> {
    let privacy = open_privacy(cli, config);
    let current = privacy.current()?;

    if current.is_empty() {
        if !cli.quiet {
            println!("  {} No hidden thumbnails to reset", "✨");
        }
        return Ok(());
    }

    if !yes {
        print!(
            "\n  {} Show thumbnails again for all {} hidden apps? [y/N] ",
            "❓",
            current.len()
        );
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    privacy.reset()?;
    if !cli.quiet {
        println!("  {} Reset {} hidden apps", "✓".green(), current.len());
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            output::print_config(&config);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("  {} {} = {}", "✓".green(), key, value);
        }
        ConfigAction::Init => {
            Config::init_dirs()?;
            if !Config::config_path().exists() {
                Config::default().save()?;
            }
            println!(
                "  {} Initialized {}",
                "✓".green(),
                recentsguard::common::format::format_path(&Config::data_dir())
            );
        }
    }
    Ok(())
}
