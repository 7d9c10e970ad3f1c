//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Command line interface for the Bonsai BRAIN service
#[derive(Parser, Debug)]
#[command(name = "bonsai")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 300, value_name = "SECS")]
    pub timeout: u64,

    /// Use this profile for the current command only
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// `--brain` / `--project` pair shared by commands that target a brain
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    /// Override to target another BRAIN
    #[arg(long)]
    pub brain: Option<String>,

    /// Override to target another project directory
    #[arg(long)]
    pub project: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Authenticate with the BRAIN server
    ///
    /// Prompts for anything not given on the command line, validates the
    /// access key and stores it in the active profile.
    Configure {
        /// Username to authenticate as
        #[arg(long)]
        username: Option<String>,

        /// Access key (prompted for, hidden, when omitted)
        #[arg(long)]
        access_key: Option<String>,

        /// Print the active profile afterwards
        #[arg(long)]
        show: bool,
    },

    /// Change the active profile
    ///
    /// For new profiles you must provide a url with the --url option.
    /// Without arguments, lists the available profiles.
    Switch {
        /// Profile to activate
        #[arg(id = "switch_profile", value_name = "PROFILE")]
        profile: Option<String>,

        /// Set the BRAIN api url of the profile
        #[arg(long)]
        url: Option<String>,

        /// Print the active profile
        #[arg(long)]
        show: bool,
    },

    /// List BRAINs owned by the current user
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a BRAIN and make it the default for this project
    ///
    /// Examples:
    ///   bonsai create cartpole
    ///   bonsai create cartpole --project ../cartpole
    Create {
        /// Name of the BRAIN; defaults to the project's default BRAIN
        brain_name: Option<String>,

        /// Override to target another project directory
        #[arg(long)]
        project: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a BRAIN
    ///
    /// A deleted BRAIN cannot be recovered and its name cannot be reused.
    /// Local files are not touched.
    Delete {
        /// Name of the BRAIN
        brain_name: String,
    },

    /// Upload project files to a BRAIN
    Push {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start and stop training on a BRAIN
    Train {
        #[command(subcommand)]
        action: TrainAction,
    },

    /// Retrieve information about simulators
    Sims {
        #[command(subcommand)]
        action: SimsAction,
    },

    /// Print simulator logs of a BRAIN version
    Log {
        #[command(flatten)]
        target: Target,

        /// BRAIN version
        #[arg(long, default_value = "latest")]
        version: String,

        /// Simulator id
        #[arg(long, default_value = "1")]
        sim: String,
    },

    /// Manage the local project file
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Diagnose problems with a training BRAIN
    ///
    /// Reads managed simulator and training telemetry and saves what it
    /// finds under ~/.bonsai_diagnose_logs. The subscription, resource group
    /// and log analytics workspace come from the active profile.
    Diagnose(DiagnoseArgs),

    /// Generate shell completions
    ///
    /// Examples:
    ///   bonsai completions bash > ~/.local/share/bash-completion/completions/bonsai
    ///   bonsai completions zsh > ~/.zfunc/_bonsai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Training subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TrainAction {
    /// Start training
    Start {
        #[command(flatten)]
        target: Target,

        /// Run the simulator on the service
        #[arg(long)]
        remote: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop training
    Stop {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show training status
    Status {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resume training of a version
    Resume {
        #[command(flatten)]
        target: Target,

        /// BRAIN version to resume
        #[arg(long, default_value = "latest")]
        version: String,

        /// Run the simulator on the service
        #[arg(long)]
        remote: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Simulator subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SimsAction {
    /// List the simulators connected to a BRAIN
    List {
        #[command(flatten)]
        target: Target,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Project file subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    /// Create a project file with default patterns
    Init {
        /// Project directory
        #[arg(long)]
        project: Option<PathBuf>,
    },

    /// Add file patterns
    Add {
        /// Patterns to add (globs or paths relative to the project)
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Project directory
        #[arg(long)]
        project: Option<PathBuf>,
    },

    /// Remove file patterns
    Remove {
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Project directory
        #[arg(long)]
        project: Option<PathBuf>,
    },

    /// List the files that would be uploaded
    Files {
        /// Project directory
        #[arg(long)]
        project: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the project file against the filesystem
    Validate {
        /// Project directory
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DiagnoseArgs {
    /// Name of the BRAIN
    #[arg(long = "name")]
    pub brain: Option<String>,

    /// Override to target another project directory
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// BRAIN version
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Concept to diagnose
    #[arg(long)]
    pub concept: String,

    /// Bearer token for the Azure telemetry APIs
    #[arg(long, env = "BONSAI_AZURE_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Also save the last 1000 simulator log records
    #[arg(long)]
    pub all_records: bool,

    /// Directory to save results under
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, env = "BONSAI_LOG_ANALYTICS_URL", hide = true)]
    pub log_analytics_url: Option<String>,

    #[arg(long, env = "BONSAI_RESOURCE_MANAGER_URL", hide = true)]
    pub resource_manager_url: Option<String>,
}
