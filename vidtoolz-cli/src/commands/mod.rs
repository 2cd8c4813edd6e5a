//! Commands that belong to the tool itself rather than to a provider.
//!
//! They are registered ahead of every provider under the owner `vidtoolz`,
//! so a plugin cannot take their names.

pub mod install;
pub mod plugins;
pub mod setup;

use crate::error::CliResult;
use crate::registry::Subcommands;

/// Owner recorded for the commands in this module.
pub const META_OWNER: &str = "vidtoolz";

pub fn register(subcommands: &mut Subcommands) -> CliResult<()> {
    subcommands.add_args::<plugins::PluginsArgs, _>(
        "plugins",
        "Get all listed plugins",
        plugins::run_plugins,
    )?;
    subcommands.add_args::<install::InstallArgs, _>(
        "install",
        "Install plugins in the same environment as vidtoolz",
        |args, _ctx| install::install_plugins(&args),
    )?;
    subcommands.add_args::<setup::SetupArgs, _>(
        "ffmpeg-setup",
        "Download or check the ffmpeg, ffprobe and ffplay binaries",
        setup::run_setup,
    )
}
