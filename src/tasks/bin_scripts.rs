//! Render secret-bearing helper scripts into `~/.local/bin`.
use std::path::PathBuf;

use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::dotfiles::{BIN_DIR, ScriptLayout, under};
use crate::config::secrets::read_value;
use crate::resources::scripts::{ScriptResource, render_template};

const TOKEN_KEY: &str = "ANTHROPIC_AUTH_TOKEN";
const BASE_URL_KEY: &str = "ANTHROPIC_BASE_URL";
const MODEL_KEY: &str = "ANTHROPIC_DEFAULT_SONNET_MODEL";

/// Token placeholder in the kimi secrets template; an unedited copy still
/// carries it.
const KIMI_TOKEN_PLACEHOLDER: &str = "__KIMI_AUTH_TOKEN__";

/// Install `cz`, `ck`, and `ccy` for the host's shell family.
#[derive(Debug)]
pub struct InstallBinScripts;

impl Task for InstallBinScripts {
    fn name(&self) -> &'static str {
        "Install bin scripts"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let layout = ScriptLayout::for_windows(ctx.platform.is_windows());
        if ctx.platform.is_windows() {
            ctx.log.info("Installing PowerShell bin scripts...");
        } else {
            ctx.log.info("Installing Unix bin scripts...");
        }

        let installer = Installer {
            ctx,
            layout,
            bin_dir: under(ctx.home(), BIN_DIR),
        };
        let mut stats = TaskStats::default();
        installer.glm(&mut stats)?;
        installer.kimi(&mut stats)?;
        installer.ccy(&mut stats)?;
        Ok(stats.finish(ctx))
    }
}

struct Installer<'a> {
    ctx: &'a Context,
    layout: ScriptLayout,
    bin_dir: PathBuf,
}

impl Installer<'_> {
    fn root_path(&self, relative: &str) -> PathBuf {
        under(self.ctx.root(), relative)
    }

    fn target(&self, name: &str) -> PathBuf {
        self.bin_dir.join(self.layout.installed(name))
    }

    /// Render template `name` with `replacements` if the template exists.
    fn generate(&self, name: &str, replacements: &[(&str, &str)], stats: &mut TaskStats) -> Result<()> {
        let template = self.root_path(&self.layout.template(name));
        let text = match std::fs::read_to_string(&template) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.ctx
                    .log
                    .debug(&format!("template not found: {}", template.display()));
                stats.skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        ScriptResource::rendered(
            self.target(name),
            render_template(&text, replacements),
            self.layout.executable,
        )
        .apply(self.ctx.log.as_ref())?;
        stats.changed += 1;
        Ok(())
    }

    fn glm(&self, stats: &mut TaskStats) -> Result<()> {
        let secrets = self.root_path(&self.layout.secrets("glm"));
        match read_value(&secrets, TOKEN_KEY)? {
            Some(token) => self.generate("cz", &[("__ANTHROPIC_AUTH_TOKEN__", token.as_str())], stats),
            None => {
                self.ctx
                    .log
                    .warn(&format!("GLM secrets not found at {}", secrets.display()));
                stats.skipped += 1;
                Ok(())
            }
        }
    }

    fn kimi(&self, stats: &mut TaskStats) -> Result<()> {
        let secrets = self.root_path(&self.layout.secrets("kimi"));
        let token = read_value(&secrets, TOKEN_KEY)?.filter(|t| t != KIMI_TOKEN_PLACEHOLDER);
        let base_url = read_value(&secrets, BASE_URL_KEY)?;
        let model = read_value(&secrets, MODEL_KEY)?;

        if let (Some(token), Some(base_url), Some(model)) = (token, base_url, model) {
            return self.generate(
                "ck",
                &[
                    ("__KIMI_AUTH_TOKEN__", token.as_str()),
                    ("__KIMI_BASE_URL__", base_url.as_str()),
                    ("__KIMI_MODEL__", model.as_str()),
                ],
                stats,
            );
        }
        self.ctx.log.warn(&format!(
            "Kimi not configured, skipping {} script generation",
            self.layout.installed("ck")
        ));
        stats.skipped += 1;
        Ok(())
    }

    fn ccy(&self, stats: &mut TaskStats) -> Result<()> {
        let source = self.root_path(&self.layout.template("ccy"));
        if !source.is_file() {
            stats.skipped += 1;
            return Ok(());
        }
        ScriptResource::copied(source, self.target("ccy"), self.layout.executable)
            .apply(self.ctx.log.as_ref())?;
        stats.changed += 1;
        Ok(())
    }
}
