//! Command-line interface definition.
use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "link-dotfiles",
    about = "Link a dotfiles repository into the home directory and projects",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Dotfiles repository root (default: $DOTFILES_ROOT, then the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub dotfiles_dir: Option<PathBuf>,

    /// Link manifest, relative to the dotfiles root unless absolute
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create links and install helper scripts
    Setup(SetupOpts),
    /// Show current link status
    Show,
    /// Print version information
    Version,
}

/// Which phases `setup` runs.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetupMode {
    /// Home dotfiles, configuration directories, and bin scripts.
    Dotfiles,
    /// Links declared in the manifest.
    AiAgents,
    /// Dotfiles, then AI agents.
    #[default]
    Both,
}

impl SetupMode {
    /// Whether the dotfiles phase runs.
    #[must_use]
    pub const fn includes_dotfiles(self) -> bool {
        matches!(self, Self::Dotfiles | Self::Both)
    }

    /// Whether the manifest phase runs.
    #[must_use]
    pub const fn includes_ai_agents(self) -> bool {
        matches!(self, Self::AiAgents | Self::Both)
    }
}

impl fmt::Display for SetupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dotfiles => "dotfiles",
            Self::AiAgents => "ai-agents",
            Self::Both => "both",
        })
    }
}

/// Options for the `setup` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct SetupOpts {
    /// Phases to run
    #[arg(long, value_enum, default_value_t = SetupMode::Both)]
    pub mode: SetupMode,

    /// Link the repository's agents into PATH/.claude/agents instead of the
    /// home dotfiles
    #[arg(long, value_name = "PATH")]
    pub project_agents: Option<PathBuf>,

    /// Do not initialize git submodules
    #[arg(long)]
    pub skip_submodules: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn setup_defaults_to_both() {
        let cli = Cli::parse_from(["link-dotfiles", "setup"]);
        let Command::Setup(opts) = cli.command else {
            panic!("expected setup");
        };
        assert_eq!(opts.mode, SetupMode::Both);
        assert!(!opts.skip_submodules);
        assert!(opts.project_agents.is_none());
    }

    #[test]
    fn parse_setup_mode_values() {
        for (arg, mode) in [
            ("dotfiles", SetupMode::Dotfiles),
            ("ai-agents", SetupMode::AiAgents),
            ("both", SetupMode::Both),
        ] {
            let cli = Cli::parse_from(["link-dotfiles", "setup", "--mode", arg]);
            let Command::Setup(opts) = cli.command else {
                panic!("expected setup");
            };
            assert_eq!(opts.mode, mode);
            assert_eq!(mode.to_string(), arg);
        }
    }

    #[test]
    fn invalid_mode_is_rejected() {
        assert!(Cli::try_parse_from(["link-dotfiles", "setup", "--mode", "all"]).is_err());
    }

    #[test]
    fn parse_project_agents_and_skip_submodules() {
        let cli = Cli::parse_from([
            "link-dotfiles",
            "setup",
            "--project-agents",
            "/work/app",
            "--skip-submodules",
        ]);
        let Command::Setup(opts) = cli.command else {
            panic!("expected setup");
        };
        assert_eq!(opts.project_agents, Some(PathBuf::from("/work/app")));
        assert!(opts.skip_submodules);
    }

    #[test]
    fn global_options_work_after_subcommand() {
        let cli = Cli::parse_from([
            "link-dotfiles",
            "show",
            "--dotfiles-dir",
            "/dots",
            "--config",
            "links.toml",
            "-v",
        ]);
        assert!(matches!(cli.command, Command::Show));
        assert_eq!(cli.global.dotfiles_dir, Some(PathBuf::from("/dots")));
        assert_eq!(cli.global.config, Some(PathBuf::from("links.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn mode_phases() {
        assert!(SetupMode::Both.includes_dotfiles() && SetupMode::Both.includes_ai_agents());
        assert!(!SetupMode::Dotfiles.includes_ai_agents());
        assert!(!SetupMode::AiAgents.includes_dotfiles());
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["link-dotfiles", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }
}
