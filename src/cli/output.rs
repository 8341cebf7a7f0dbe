use colored::*;

use crate::apps::{section_label, ScanResults, SectionIndex};
use crate::common::config::Config;
use crate::common::format::{self, format_duration, format_hidden, format_path};

/// Print the app catalog grouped by section
pub fn print_app_list(results: &ScanResults, detailed: bool) {
    println!();
    println!(
        "  {} Recents Privacy ({}, {} hidden)",
        "🔒",
        format::format_count(results.entries.len()),
        results.hidden_count()
    );
    println!(
        "  Scanned in {}",
        format_duration(results.duration_secs).cyan()
    );
    println!("{}", "─".repeat(70).dimmed());
    println!();

    if results.entries.is_empty() {
        println!("  No applications found.");
    } else {
        println!(
            "  {:<30} {:<35} {}",
            "Title".dimmed(),
            "Package".dimmed(),
            "Thumbnail".dimmed(),
        );
        println!("  {}", "─".repeat(68).dimmed());

        let mut last_label: Option<String> = None;
        for entry in &results.entries {
            let label = section_label(entry);
            if last_label.as_deref() != Some(label.as_str()) {
                let heading = if label.is_empty() { "#" } else { label.as_str() };
                println!("  {}", heading.bold().cyan());
                last_label = Some(label);
            }
            println!(
                "  {:<30} {:<35} {}",
                format::truncate(&entry.title, 30),
                format::truncate(&entry.package, 35).dimmed(),
                format_hidden(entry.privacy_hidden),
            );
        }
    }

    if detailed && !results.excluded.is_empty() {
        println!();
        println!("  {} Excluded ({})", "⊘", results.excluded.len());
        println!();
        for app in &results.excluded {
            println!(
                "    {:<35} {}",
                format::truncate(&app.package, 35),
                format!("[{}]", app.reason).dimmed(),
            );
        }
    }
    println!();
}

/// Print scan results as JSON
pub fn print_scan_json(results: &ScanResults, index: &SectionIndex) {
    let json = serde_json::json!({
        "entries": results.entries,
        "sections": index,
        "excluded": results.excluded,
        "hidden_count": results.hidden_count(),
        "duration_secs": results.duration_secs,
        "scanned_at": results.scanned_at,
    });
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing: {}", e),
    }
}

/// Print scan results in minimal form: one tab-separated line per app
pub fn print_scan_quiet(results: &ScanResults) {
    for entry in &results.entries {
        println!(
            "{}\t{}",
            entry.package,
            if entry.privacy_hidden { "hidden" } else { "visible" }
        );
    }
}

/// Print the fast-scroll section index
pub fn print_sections(index: &SectionIndex) {
    println!();
    println!("  {} Sections ({})", "📑", index.len());
    println!("{}", "─".repeat(30).dimmed());
    for section in index.sections() {
        let label = if section.label.is_empty() { "\"\"" } else { section.label.as_str() };
        println!("  {:<6} {:>6}", label.bold(), section.first_offset);
    }
    println!();
}

/// Print the outcome of a hide/show/toggle request
pub fn print_toggle_result(package: &str, requested: bool, state: bool) {
    if requested == state {
        println!(
            "  {} {} is now {}",
            "✓".green(),
            package.bold(),
            format_hidden(state)
        );
    } else {
        println!(
            "  {} {} was already {} (reported state: {})",
            "ℹ️",
            package.bold(),
            format_hidden(requested),
            format_hidden(state)
        );
    }
}

/// Print the current configuration
pub fn print_config(config: &Config) {
    println!();
    println!("  {} Configuration", "⚙️");
    println!("{}", "─".repeat(50).dimmed());
    format::print_kv("Config file", &format_path(&Config::config_path()));
    format::print_kv("Settings key", &config.settings_key);
    format::print_kv("Store", &format_path(&config.store_file()));
    format::print_kv("Registry", &format_path(&config.registry_file()));
    format::print_kv("Log to file", &config.log_to_file.to_string());
    format::print_kv("Output", &format!("{:?}", config.output_format).to_lowercase());
    println!();
}
