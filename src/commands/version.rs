//! Command: print version information.

/// Version stamped by the build script, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("LINK_DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("link-dotfiles {}", version());
}
