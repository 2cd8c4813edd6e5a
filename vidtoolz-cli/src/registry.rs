// ============================================================================
// vidtoolz-cli/src/registry.rs
// ============================================================================
//
// PLUGIN REGISTRY: Command providers and the shared subcommand namespace
//
// A provider contributes subcommands through one capability,
// `register_commands`. The registry holds providers in a fixed order,
// built-ins first and then external providers, and calls each of them once
// per registration pass.
//
// KEY COMPONENTS:
// - CommandProvider: the provider capability
// - Subcommands: append-only namespace of clap commands plus bound handlers
// - ProviderRegistry: ordered, idempotently discovered provider list
// - ProviderInfo: what `plugins` reports for each provider
//
// INVARIANTS:
// - subcommand names are unique across all providers; a second registration
//   of a name is `CliError::DuplicateCommand`
// - discovery runs once; later calls are no-ops
// - a provider that fails to load is reported and left out, the rest load

use std::collections::HashSet;
use std::fmt;

use clap::{ArgMatches, Args, Command, FromArgMatches};
use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::external;
use crate::providers;

/// Name of the single hook every provider implements.
pub const REGISTER_COMMANDS_HOOK: &str = "register_commands";

/// Function bound to a subcommand, called with its parsed arguments.
pub type Handler = Box<dyn Fn(&ArgMatches, &AppContext) -> CliResult<()>>;

/// A unit that contributes one or more subcommands.
pub trait CommandProvider {
    /// Identity of the provider, e.g. `vidtoolz.builtin.clip` or a package name.
    fn name(&self) -> &str;

    /// Declared version, for providers installed as packages.
    fn version(&self) -> Option<&str> {
        None
    }

    /// Hook names this provider implements.
    fn hooks(&self) -> Vec<&'static str> {
        vec![REGISTER_COMMANDS_HOOK]
    }

    /// Adds this provider's subcommands.
    fn register_commands(&self, subcommands: &mut Subcommands) -> CliResult<()>;
}

/// Metadata reported by `plugins`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: String,
    pub hooks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl fmt::Display for ProviderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, " {version}")?;
        }
        write!(f, " [{}]", self.hooks.join(", "))
    }
}

/// One registered subcommand.
pub struct SubcommandEntry {
    pub(crate) command: Command,
    pub(crate) handler: Handler,
    pub(crate) owner: String,
}

impl SubcommandEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// One-line description shown in the command listing.
    #[must_use]
    pub fn description(&self) -> String {
        self.command
            .get_about()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Append-only namespace that providers register into.
///
/// Providers can only add; reading the namespace is reserved for the
/// dispatcher so no provider depends on another's registrations.
#[derive(Default)]
pub struct Subcommands {
    entries: Vec<SubcommandEntry>,
    names: HashSet<String>,
    owner: String,
}

impl Subcommands {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command` with a handler over raw matches.
    pub fn add<F>(&mut self, command: Command, handler: F) -> CliResult<()>
    where
        F: Fn(&ArgMatches, &AppContext) -> CliResult<()> + 'static,
    {
        let name = command.get_name().to_string();
        if !self.names.insert(name.clone()) {
            let owner = self
                .entries
                .iter()
                .find(|e| e.name() == name)
                .map(|e| e.owner.clone())
                .unwrap_or_default();
            return Err(CliError::DuplicateCommand { name, owner });
        }
        log::debug!("Registered subcommand '{}' from {}", name, self.owner);
        self.entries.push(SubcommandEntry {
            command,
            handler: Box::new(handler),
            owner: self.owner.clone(),
        });
        Ok(())
    }

    /// Registers a subcommand whose arguments are described by a
    /// `#[derive(clap::Args)]` struct; the handler receives the parsed struct.
    pub fn add_args<A, F>(&mut self, name: &str, about: &str, handler: F) -> CliResult<()>
    where
        A: Args + FromArgMatches + 'static,
        F: Fn(A, &AppContext) -> CliResult<()> + 'static,
    {
        let command = A::augment_args(Command::new(name.to_string()).about(about.to_string()));
        self.add(command, move |matches, ctx| {
            let args = A::from_arg_matches(matches).map_err(|e| CliError::Failed(e.to_string()))?;
            handler(args, ctx)
        })
    }

    pub(crate) fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_string();
    }

    pub(crate) fn entries(&self) -> &[SubcommandEntry] {
        &self.entries
    }

    pub(crate) fn get(&self, name: &str) -> Option<&SubcommandEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered list of providers: built-ins first, then external ones.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn CommandProvider>>,
    discovery: DiscoveryConfig,
    discovered: bool,
    failures: Vec<CliError>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new(discovery: DiscoveryConfig) -> Self {
        Self {
            providers: Vec::new(),
            discovery,
            discovered: false,
            failures: Vec::new(),
        }
    }

    /// Adds a provider after those already present. A provider whose name
    /// is already registered is skipped.
    pub fn register(&mut self, provider: Box<dyn CommandProvider>) -> bool {
        if self.providers.iter().any(|p| p.name() == provider.name()) {
            log::warn!("Plugin '{}' is already registered; skipping", provider.name());
            return false;
        }
        log::debug!("Registered plugin {}", provider.name());
        self.providers.push(provider);
        true
    }

    /// Loads built-in providers and, unless disabled, external ones.
    ///
    /// Only the first call does anything. Load failures are logged, kept in
    /// [`ProviderRegistry::failures`] and do not stop discovery.
    pub fn discover(&mut self) {
        if self.discovered {
            return;
        }
        self.discovered = true;

        for provider in providers::builtin_providers() {
            self.register(provider);
        }

        if !self.discovery.external_enabled {
            log::debug!("External plugin discovery disabled");
            return;
        }

        let (found, failures) = external::discover(&self.discovery);
        for failure in failures {
            log::warn!("{}", failure);
            self.failures.push(failure);
        }
        for provider in found {
            self.register(provider);
        }
    }

    #[must_use]
    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Providers that could not be loaded during discovery.
    #[must_use]
    pub fn failures(&self) -> &[CliError] {
        &self.failures
    }

    #[must_use]
    pub fn list_providers(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo {
                name: p.name().to_string(),
                hooks: p.hooks().into_iter().map(String::from).collect(),
                version: p.version().map(String::from),
            })
            .collect()
    }

    /// Calls `register_commands` on every provider in order.
    ///
    /// A duplicate subcommand name aborts the pass; it is a configuration
    /// error, not a load failure.
    pub fn invoke_registration(&self, subcommands: &mut Subcommands) -> CliResult<()> {
        for provider in &self.providers {
            subcommands.set_owner(provider.name());
            match provider.register_commands(subcommands) {
                Ok(()) => {}
                Err(e @ CliError::DuplicateCommand { .. }) => return Err(e),
                Err(e) => log::warn!("Plugin '{}' failed to register: {}", provider.name(), e),
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
