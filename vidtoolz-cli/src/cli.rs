// ============================================================================
// vidtoolz-cli/src/cli.rs
// ============================================================================
//
// DISPATCHER: Assembles the command line and runs the selected handler
//
// Order of a run:
//   1. rewrite legacy multi-letter short flags (`install -fr`, `-ncd`)
//   2. discover providers (built-ins, then external)
//   3. register the tool's own commands, then every provider's
//   4. build the root clap command from the namespace and parse
//   5. call the handler bound to the chosen subcommand
//
// Exit status: 2 for usage errors (clap's own status) and for duplicate
// subcommand names; 0 otherwise, including failed media operations, which
// are reported on stdout.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command};

use crate::commands;
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::logging;
use crate::registry::Subcommands;
use crate::terminal;

/// Name shown in usage lines.
pub const BIN_NAME: &str = "vidtoolz";

const ABOUT: &str = "Video tools for editing videos";

/// Multi-letter short flags accepted by `install`, with their long forms.
const LEGACY_INSTALL_FLAGS: [(&str, &str); 2] =
    [("-fr", "--force-reinstall"), ("-ncd", "--no-cache-dir")];

/// Rewrites `-fr` and `-ncd` after the `install` subcommand to their long
/// forms; clap short flags are single characters.
#[must_use]
pub fn rewrite_legacy_flags(args: Vec<OsString>) -> Vec<OsString> {
    let mut in_install = false;
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            if index > 0 && !in_install && arg == "install" {
                in_install = true;
                return arg;
            }
            if in_install {
                if let Some((_, long)) = LEGACY_INSTALL_FLAGS.iter().find(|(short, _)| arg == *short) {
                    return OsString::from(*long);
                }
            }
            arg
        })
        .collect()
}

/// True when `-v`/`--verbose` appears anywhere before a `--`.
#[must_use]
pub fn verbose_requested(args: &[OsString]) -> bool {
    args.iter()
        .skip(1)
        .take_while(|a| *a != "--")
        .any(|a| a == "-v" || a == "--verbose")
}

/// The command listing: one aligned line per subcommand, in registration order.
#[must_use]
pub fn command_listing(subcommands: &Subcommands) -> String {
    subcommands
        .entries()
        .iter()
        .map(|entry| terminal::command_line(entry.name(), &entry.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the root command from a fully populated namespace.
///
/// The listing is carried in `after_help` so descriptions from plugins are
/// never read as template placeholders.
#[must_use]
pub fn build_root_command(subcommands: &Subcommands) -> Command {
    let template = "\
{about-with-newline}
{usage-heading} {usage}

{after-help}

Options:
{options}";

    let root = Command::new(BIN_NAME)
        .about(ABOUT)
        .version(clap::crate_version!())
        .disable_help_subcommand(true)
        .help_template(template)
        .after_help(format!("Commands:\n{}", command_listing(subcommands)))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Show debug logging"),
        );

    subcommands
        .entries()
        .iter()
        .fold(root, |root, entry| root.subcommand(entry.command.clone()))
}

/// Registers the tool's own commands and then every provider's.
pub fn assemble(ctx: &mut AppContext) -> CliResult<Subcommands> {
    ctx.registry_mut().discover();
    let mut subcommands = Subcommands::new();
    subcommands.set_owner(commands::META_OWNER);
    commands::register(&mut subcommands)?;
    ctx.registry().invoke_registration(&mut subcommands)?;
    Ok(subcommands)
}

/// Parses `args` and runs the chosen handler. Returns the process exit status.
pub fn run_with(args: Vec<OsString>, ctx: &mut AppContext) -> i32 {
    let args = rewrite_legacy_flags(args);

    let subcommands = match assemble(ctx) {
        Ok(subcommands) => subcommands,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {e}");
            return e.exit_code();
        }
    };

    let mut root = build_root_command(&subcommands);
    let matches = match root.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(e) => {
            // clap prints help/version to stdout and errors to stderr
            let _ = e.print();
            return e.exit_code();
        }
    };

    let Some((name, sub_matches)) = matches.subcommand() else {
        if let Err(e) = root.print_help() {
            log::warn!("Failed to print help: {}", e);
        }
        println!();
        return 0;
    };

    let Some(entry) = subcommands.get(name) else {
        // clap only yields names it was given
        log::error!("No handler bound to '{}'", name);
        return 2;
    };

    log::debug!("Dispatching '{}' (from {})", name, entry.owner());
    match (entry.handler)(sub_matches, ctx) {
        Ok(()) => 0,
        Err(e) => {
            report_handler_error(&e);
            0
        }
    }
}

fn report_handler_error(err: &CliError) {
    log::debug!("Handler failed: {:?}", err);
    match err {
        CliError::Core(core) if core.is_user_error() => {
            terminal::print_error(&format!("Error: {core}"));
        }
        other => terminal::print_error(&format!("An error occurred: {other}")),
    }
}

/// Entry point shared by the `vidtoolz` and `vid` binaries.
#[must_use]
pub fn run() -> i32 {
    let args: Vec<OsString> = std::env::args_os().collect();
    logging::init(verbose_requested(&args));
    let mut ctx = AppContext::from_env();
    run_with(args, &mut ctx)
}
