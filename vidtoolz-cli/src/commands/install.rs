//! `install`: add plugin packages with `cargo install`.
//!
//! Plugins are binaries named `vidtoolz-<cmd>`; once cargo has put them on
//! `PATH` they are picked up by the next run.

use std::path::{Path, PathBuf};

use clap::Args;
use vidtoolz_core::ToolCommand;

use crate::cli_error;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallArgs {
    /// Upgrade packages that are already installed (cargo's default)
    #[arg(short, long)]
    pub upgrade: bool,

    /// Install from a local source tree
    #[arg(short, long, value_name = "PATH")]
    pub editable: Option<PathBuf>,

    /// Reinstall even when the same version is present
    #[arg(long)]
    pub force_reinstall: bool,

    /// Build in a throwaway target directory
    #[arg(long)]
    pub no_cache_dir: bool,

    /// Packages to install
    #[arg(required = true, num_args = 1..)]
    pub packages: Vec<String>,
}

/// `cargo install [--path P] [--force] [--target-dir D] PACKAGES...`
#[must_use]
pub fn build_install_command(cargo: &Path, args: &InstallArgs, target_dir: Option<&Path>) -> ToolCommand {
    let mut cmd = ToolCommand::new(cargo).arg("install");
    if let Some(path) = &args.editable {
        cmd = cmd.arg("--path").path(path);
    }
    if args.force_reinstall {
        cmd = cmd.arg("--force");
    }
    if let Some(dir) = target_dir {
        cmd = cmd.arg("--target-dir").path(dir);
    }
    cmd.args(&args.packages)
}

fn locate_cargo() -> CliResult<PathBuf> {
    if let Some(cargo) = std::env::var_os("CARGO") {
        return Ok(PathBuf::from(cargo));
    }
    which::which("cargo").map_err(|e| cli_error!("cargo not found on PATH: {e}"))
}

/// Runs `cargo install` with the terminal attached.
pub fn install_plugins(args: &InstallArgs) -> CliResult<()> {
    let cargo = locate_cargo()?;
    let scratch = if args.no_cache_dir {
        Some(
            tempfile::Builder::new()
                .prefix("vidtoolz_install_")
                .tempdir()
                .cli_context("Failed to create a build directory")?,
        )
    } else {
        None
    };
    if args.upgrade {
        log::debug!("--upgrade requested; cargo install upgrades by default");
    }

    let cmd = build_install_command(&cargo, args, scratch.as_ref().map(|d| d.path()));
    log::info!("Running {}", cmd.display());
    let status = cmd
        .to_std()
        .status()
        .cli_with_context(|| format!("Failed to run {}", cargo.display()))?;

    if status.success() {
        terminal::print_success(&format!("Installed {}", args.packages.join(", ")));
    } else {
        terminal::print_error(&format!(
            "cargo install failed. Return code: {}",
            status.code().unwrap_or(-1)
        ));
    }
    Ok(())
}
