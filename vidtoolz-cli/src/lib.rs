// vidtoolz-cli/src/lib.rs
//
// Library portion of the vidtoolz CLI: the plugin registry, the built-in
// command providers and the dispatcher. Both binaries call `run`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod external;
pub mod logging;
pub mod providers;
pub mod registry;
pub mod terminal;

// Re-export items needed by the binaries or integration tests
pub use cli::{run, run_with};
pub use config::DiscoveryConfig;
pub use context::AppContext;
pub use error::{CliError, CliResult};
pub use registry::{CommandProvider, ProviderInfo, ProviderRegistry, Subcommands};
