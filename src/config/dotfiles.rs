//! Fixed link and script tables for the dotfiles repository layout.
//!
//! Sources are relative to the dotfiles root; targets are relative to the
//! home directory. Both use `/` and are split into components when joined.
use std::path::{Path, PathBuf};

/// A source in the dotfiles root linked to a path under home.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeLink {
    /// Path relative to the dotfiles root.
    pub source: &'static str,
    /// Path relative to the home directory.
    pub target: &'static str,
}

const fn link(source: &'static str, target: &'static str) -> HomeLink {
    HomeLink { source, target }
}

/// Shell and editor dotfiles linked directly into home.
pub const BASE_DOTFILES: &[HomeLink] = &[
    link(".gitconfig", ".gitconfig"),
    link(".gitignore_global", ".gitignore_global"),
    link(".tmux.conf", ".tmux.conf"),
    link(".vimrc", ".vimrc"),
];

/// GitHub Copilot instructions, prompts, and agents under `~/.github`.
pub const GITHUB_CONFIG: &[HomeLink] = &[
    link(
        ".github/copilot-instructions.md",
        ".github/copilot-instructions.md",
    ),
    link(".github/prompts", ".github/prompts"),
    link("agents", ".github/agents"),
];

/// Application configuration under `~/.config`.
pub const CONFIG_DIRS: &[HomeLink] = &[
    link(".config/starship.toml", ".config/starship.toml"),
    link(".config/nvim", ".config/nvim"),
    link(".config/alacritty", ".config/alacritty"),
    link(".config/kitty", ".config/kitty"),
    link(".config/wezterm", ".config/wezterm"),
];

/// Windows Terminal settings source.
pub const TERMINAL_SETTINGS: &str = ".config/windows-terminal/settings.json";

/// Windows Terminal package state directories; settings are linked only into
/// the ones that exist.
pub const TERMINAL_ROOTS: &[&str] = &[
    "AppData/Local/Packages/Microsoft.WindowsTerminal_8wekyb3d8bbwe/LocalState",
    "AppData/Local/Packages/Microsoft.WindowsTerminalPreview_8wekyb3d8bbwe/LocalState",
];

/// PowerShell profile source.
pub const POWERSHELL_PROFILE: &str = ".config/powershell/profile.ps1";

/// Both PowerShell editions read their own profile path.
pub const POWERSHELL_PROFILE_TARGETS: &[&str] = &[
    "Documents/PowerShell/Microsoft.PowerShell_profile.ps1",
    "Documents/WindowsPowerShell/Microsoft.PowerShell_profile.ps1",
];

/// Source directory linked into `<project>/.claude/agents`.
pub const PROJECT_AGENTS_SOURCE: &str = "agents";

/// Location of the agents link inside a project.
pub const PROJECT_AGENTS_TARGET: &str = ".claude/agents";

/// Directory helper scripts are installed into, relative to home.
pub const BIN_DIR: &str = ".local/bin";

/// File layout of helper scripts and their secrets for one shell family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLayout {
    /// Template directory relative to the dotfiles root.
    pub template_dir: &'static str,
    /// Extension of templates and secrets files (`sh` or `ps1`).
    pub source_ext: &'static str,
    /// Suffix appended to installed script names.
    pub installed_suffix: &'static str,
    /// Whether installed scripts are marked executable.
    pub executable: bool,
}

impl ScriptLayout {
    /// zsh scripts for Unix hosts.
    pub const UNIX: Self = Self {
        template_dir: "shell/bin/zsh",
        source_ext: "sh",
        installed_suffix: "",
        executable: true,
    };

    /// PowerShell scripts for Windows hosts.
    pub const WINDOWS: Self = Self {
        template_dir: "shell/bin/powershell",
        source_ext: "ps1",
        installed_suffix: ".ps1",
        executable: false,
    };

    /// Layout for the host family.
    #[must_use]
    pub const fn for_windows(is_windows: bool) -> Self {
        if is_windows { Self::WINDOWS } else { Self::UNIX }
    }

    /// Template for script `name`, relative to the dotfiles root.
    #[must_use]
    pub fn template(&self, name: &str) -> String {
        format!("{}/{name}.{}", self.template_dir, self.source_ext)
    }

    /// Secrets file for provider `name`, relative to the dotfiles root.
    #[must_use]
    pub fn secrets(&self, name: &str) -> String {
        format!("secrets/claude-code/{name}/{name}.{}", self.source_ext)
    }

    /// Installed script name.
    #[must_use]
    pub fn installed(&self, name: &str) -> String {
        format!("{name}{}", self.installed_suffix)
    }
}

/// Join a `/`-separated relative path onto `base` component by component.
#[must_use]
pub fn under(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |path, segment| path.join(segment))
}
