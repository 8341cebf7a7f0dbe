use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// recentsguard: hide task-switcher thumbnails for selected apps
#[derive(Parser, Debug)]
#[command(
    name = "recentsguard",
    version,
    about = "Hide task-switcher thumbnails for selected apps",
    long_about = "recentsguard lists the apps whose recents thumbnails can be hidden\n\
                   and keeps the hidden-package list in the shared settings store.",
    after_help = "EXAMPLES:\n  \
        recentsguard list                      Apps, hidden ones first\n  \
        recentsguard list --detailed           Also show excluded packages\n  \
        recentsguard hide com.example.bank     Hide an app's thumbnail\n  \
        recentsguard show com.example.bank     Show it again\n  \
        recentsguard toggle com.example.mail   Flip the current state\n  \
        recentsguard status com.example.mail   Query one package\n  \
        recentsguard sections --format json    Fast-scroll index\n  \
        recentsguard reset --yes               Show every thumbnail again"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured one)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Settings store file
    #[arg(long, global = true, env = "RECENTSGUARD_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Device snapshot file
    #[arg(long, global = true, env = "RECENTSGUARD_REGISTRY", value_name = "PATH")]
    pub registry: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List apps whose thumbnails can be hidden
    List {
        /// Also show packages left out and why
        #[arg(long)]
        detailed: bool,
    },

    /// Show the fast-scroll section index
    Sections,

    /// Hide an app's thumbnail
    Hide {
        /// Package identifier
        package: String,
    },

    /// Show an app's thumbnail again
    Show {
        /// Package identifier
        package: String,
    },

    /// Flip an app's current state
    Toggle {
        /// Package identifier
        package: String,
    },

    /// Show whether an app's thumbnail is hidden
    Status {
        /// Package identifier
        package: String,
    },

    /// Show every thumbnail again
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize recentsguard directories and default config
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
