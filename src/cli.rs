use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "alcove")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Disposable macOS user accounts for running an isolated Homebrew", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Confirm plans and let sysadminctl prompt for passwords [default: stdin is a terminal]
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub tty: Option<bool>,

    /// Do not install Homebrew into created instances
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Whether an operator is there to answer prompts.
    pub fn tty(&self) -> bool {
        self.tty.unwrap_or_else(|| std::io::stdin().is_terminal())
    }
}

/// Machine-level overrides, mostly useful for testing on a scratch layout.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Prefix of every instance account
    #[arg(long, env = "ALCOVE_ACCOUNT_PREFIX", global = true, hide = true)]
    pub account_prefix: Option<String>,

    /// User owning the instances [default: id -un]
    #[arg(long, env = "ALCOVE_HOST_USER", global = true, hide = true)]
    pub host_user: Option<String>,

    /// Parent of instance home directories
    #[arg(long, env = "ALCOVE_HOME_ROOT", global = true, hide = true)]
    pub home_root: Option<PathBuf>,

    /// Directory for sudoers grants
    #[arg(long, env = "ALCOVE_SUDOERS_DIR", global = true, hide = true)]
    pub sudoers_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create instances (and install Homebrew into them)
    Create(CreateArgs),

    /// Delete instances and their sudoers grants
    #[command(visible_aliases = ["remove", "rm"])]
    Delete(DeleteArgs),

    /// List instances owned by the current user
    #[command(visible_alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct CreateArgs {
    /// Instance names (default: "default")
    pub instances: Vec<String>,

    /// Instance name, for a single instance
    #[arg(long, default_value = "")]
    pub name: String,

    /// Password for the new account (generated when omitted without a tty)
    #[arg(long, value_name = "PASSWORD")]
    pub user_password: Option<String>,

    /// Homebrew packages to install, comma-separated
    #[arg(long, value_delimiter = ',', value_name = "FORMULA")]
    pub tools: Vec<String>,

    /// Also install git, gh, python@3.12, uv and bun
    #[arg(long)]
    pub default_tools: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Instance names
    #[arg(required = true, num_args = 1..)]
    pub instances: Vec<String>,
}
