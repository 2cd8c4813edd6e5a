// ============================================================================
// vidtoolz-cli/src/external.rs
// ============================================================================
//
// EXTERNAL PROVIDERS: Plugins that live outside this binary
//
// Two sources, read in this order:
//
// 1. The plugin manifest, a JSON file listing installed plugin packages:
//
//      {
//        "plugins": [
//          {
//            "name": "vidtoolz-gif",
//            "version": "0.3.1",
//            "executable": "vidtoolz-gif",
//            "commands": [{ "name": "gif", "description": "Convert to GIF" }]
//          }
//        ]
//      }
//
//    Each listed command runs `<executable> <command> <args...>`.
//
// 2. Executables on PATH named `vidtoolz-<cmd>`, each adding the subcommand
//    `<cmd>` that runs `vidtoolz-<cmd> <args...>`. Executables already
//    claimed by a manifest entry are skipped.
//
// Plugin commands inherit stdin/stdout/stderr. Their exit status is
// reported but does not change ours.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command as ProcessCommand;

use clap::{Arg, ArgAction, Command};
use serde::Deserialize;

use crate::config::DiscoveryConfig;
use crate::error::{CliError, CliResult};
use crate::registry::{CommandProvider, Subcommands};
use crate::terminal;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PluginManifest {
    #[serde(default)]
    pub plugins: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub executable: PathBuf,
    #[serde(default)]
    pub commands: Vec<ManifestCommand>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ManifestCommand {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A subcommand forwarded to an external executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub name: String,
    pub description: String,
    /// Arguments placed before the user's own
    pub leading_args: Vec<String>,
}

/// Provider backed by an executable outside this binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProvider {
    name: String,
    version: Option<String>,
    executable: PathBuf,
    commands: Vec<ExternalCommand>,
}

impl ExternalProvider {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        executable: PathBuf,
        commands: Vec<ExternalCommand>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            executable,
            commands,
        }
    }

    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    #[must_use]
    pub fn commands(&self) -> &[ExternalCommand] {
        &self.commands
    }
}

impl CommandProvider for ExternalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn register_commands(&self, subcommands: &mut Subcommands) -> CliResult<()> {
        for command in &self.commands {
            let clap_command = Command::new(command.name.clone())
                .about(command.description.clone())
                .disable_help_flag(true)
                .arg(
                    Arg::new("args")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true)
                        .action(ArgAction::Append),
                );
            let executable = self.executable.clone();
            let leading = command.leading_args.clone();
            let name = command.name.clone();
            subcommands.add(clap_command, move |matches, _ctx| {
                let trailing: Vec<String> = matches
                    .get_many::<String>("args")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default();
                forward(&name, &executable, &leading, &trailing)
            })?;
        }
        Ok(())
    }
}

fn forward(name: &str, executable: &Path, leading: &[String], trailing: &[String]) -> CliResult<()> {
    log::debug!(
        "Forwarding '{}' to {} {:?} {:?}",
        name,
        executable.display(),
        leading,
        trailing
    );
    let status = ProcessCommand::new(executable)
        .args(leading)
        .args(trailing)
        .status()
        .map_err(|e| CliError::ProviderLoad {
            provider: executable.display().to_string(),
            reason: e.to_string(),
        })?;
    if !status.success() {
        terminal::print_error(&format!(
            "Plugin command '{}' exited with code {}",
            name,
            status.code().unwrap_or(-1)
        ));
    }
    Ok(())
}

/// Parses manifest JSON text.
pub fn parse_manifest(text: &str, path: &Path) -> CliResult<PluginManifest> {
    serde_json::from_str(text).map_err(|e| CliError::Manifest {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Reads the manifest; a missing file is an empty manifest.
pub fn load_manifest(path: &Path) -> CliResult<PluginManifest> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_manifest(&text, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No plugin manifest at {}", path.display());
            Ok(PluginManifest::default())
        }
        Err(e) => Err(CliError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Resolves a manifest executable: absolute or relative paths as given,
/// bare names through the search path.
pub fn resolve_executable(executable: &Path, config: &DiscoveryConfig) -> CliResult<PathBuf> {
    if executable.components().count() > 1 || executable.is_absolute() {
        return if executable.is_file() {
            Ok(executable.to_path_buf())
        } else {
            Err(CliError::Failed(format!("{} does not exist", executable.display())))
        };
    }
    let search = std::env::join_paths(config.search_dirs())
        .map_err(|e| CliError::Failed(e.to_string()))?;
    let cwd = std::env::current_dir()?;
    which::which_in(executable, Some(search), cwd)
        .map_err(|e| CliError::Failed(format!("{}: {}", executable.display(), e)))
}

fn provider_from_entry(entry: &ManifestEntry, config: &DiscoveryConfig) -> CliResult<ExternalProvider> {
    let executable = resolve_executable(&entry.executable, config).map_err(|e| CliError::ProviderLoad {
        provider: entry.name.clone(),
        reason: e.to_string(),
    })?;
    let commands = entry
        .commands
        .iter()
        .map(|c| ExternalCommand {
            name: c.name.clone(),
            description: c.description.clone(),
            leading_args: vec![c.name.clone()],
        })
        .collect();
    Ok(ExternalProvider::new(
        entry.name.clone(),
        entry.version.clone(),
        executable,
        commands,
    ))
}

/// Subcommand name for a plugin executable file name, if it is one.
#[must_use]
pub fn command_name_for(file_name: &str, prefix: &str) -> Option<String> {
    let stem = file_name
        .strip_suffix(std::env::consts::EXE_SUFFIX)
        .filter(|_| !std::env::consts::EXE_SUFFIX.is_empty())
        .unwrap_or(file_name);
    stem.strip_prefix(prefix)
        .filter(|name| !name.is_empty() && !name.contains('.'))
        .map(str::to_string)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Plugin executables on the search path; the first directory wins for a name.
#[must_use]
pub fn scan_path(config: &DiscoveryConfig) -> Vec<ExternalProvider> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    for dir in config.search_dirs() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
        paths.sort();
        for path in paths {
            let Some(file_name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_owned)
            else {
                continue;
            };
            let Some(command) = command_name_for(&file_name, &config.executable_prefix) else {
                continue;
            };
            if !is_executable(&path) || !seen.insert(command.clone()) {
                continue;
            }
            log::debug!("Found plugin executable {}", path.display());
            found.push(ExternalProvider::new(
                format!("{}{}", config.executable_prefix, command),
                None,
                path,
                vec![ExternalCommand {
                    description: format!("External plugin command ({})", file_name),
                    name: command,
                    leading_args: Vec::new(),
                }],
            ));
        }
    }
    found
}

/// Loads every external provider. Failures are returned next to the
/// providers that did load.
pub fn discover(config: &DiscoveryConfig) -> (Vec<Box<dyn CommandProvider>>, Vec<CliError>) {
    let mut providers: Vec<Box<dyn CommandProvider>> = Vec::new();
    let mut failures = Vec::new();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    if let Some(path) = &config.manifest_path {
        match load_manifest(path) {
            Ok(manifest) => {
                for entry in &manifest.plugins {
                    match provider_from_entry(entry, config) {
                        Ok(provider) => {
                            claimed.insert(provider.executable().to_path_buf());
                            providers.push(Box::new(provider));
                        }
                        Err(e) => failures.push(e),
                    }
                }
            }
            Err(e) => failures.push(e),
        }
    }

    for provider in scan_path(config) {
        if claimed.contains(provider.executable()) {
            continue;
        }
        providers.push(Box::new(provider));
    }

    (providers, failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(dir: &Path, manifest: Option<PathBuf>) -> DiscoveryConfig {
        DiscoveryConfig {
            manifest_path: manifest,
            executable_prefix: "vidtoolz-".to_string(),
            search_path: Some(dir.as_os_str().to_owned()),
            external_enabled: true,
        }
    }

    #[cfg(unix)]
    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_parse_manifest() {
        let text = r#"{"plugins": [{"name": "vidtoolz-gif", "version": "0.3.1",
            "executable": "vidtoolz-gif",
            "commands": [{"name": "gif", "description": "Convert to GIF"}]}]}"#;
        let manifest = parse_manifest(text, Path::new("plugins.json")).unwrap();
        assert_eq!(manifest.plugins.len(), 1);
        assert_eq!(manifest.plugins[0].version.as_deref(), Some("0.3.1"));
        assert_eq!(manifest.plugins[0].commands[0].name, "gif");
    }

    #[test]
    fn test_bad_manifest_is_reported() {
        let err = parse_manifest("{not json", Path::new("p.json")).unwrap_err();
        assert!(matches!(err, CliError::Manifest { .. }));
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = load_manifest(&dir.path().join("none.json")).unwrap();
        assert!(manifest.plugins.is_empty());
    }

    #[test]
    fn test_command_name_for() {
        assert_eq!(command_name_for("vidtoolz-gif", "vidtoolz-").as_deref(), Some("gif"));
        assert_eq!(command_name_for("vidtoolz-", "vidtoolz-"), None);
        assert_eq!(command_name_for("vidtoolz-gif.sh", "vidtoolz-"), None);
        assert_eq!(command_name_for("ffmpeg", "vidtoolz-"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_path_finds_executables_only() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "vidtoolz-gif");
        std::fs::write(dir.path().join("vidtoolz-notes"), "not executable").unwrap();
        let providers = scan_path(&config_for(dir.path(), None));
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].name(), "vidtoolz-gif");
        assert_eq!(providers[0].commands()[0].name, "gif");
        assert_eq!(
            providers[0].commands()[0].description,
            "External plugin command (vidtoolz-gif)"
        );
        assert_eq!(providers[0].executable(), dir.path().join("vidtoolz-gif"));
        assert!(providers[0].commands()[0].leading_args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_manifest_entry_claims_its_executable() {
        let dir = tempfile::tempdir().unwrap();
        make_executable(dir.path(), "vidtoolz-gif");
        let manifest = dir.path().join("plugins.json");
        std::fs::write(
            &manifest,
            r#"{"plugins": [
                {"name": "vidtoolz-gif", "version": "1.0.0", "executable": "vidtoolz-gif",
                 "commands": [{"name": "gif", "description": "Convert to GIF"},
                              {"name": "webp", "description": "Convert to WebP"}]},
                {"name": "broken", "executable": "vidtoolz-missing", "commands": []}
            ]}"#,
        )
        .unwrap();

        let (providers, failures) = discover(&config_for(dir.path(), Some(manifest)));
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].version(), Some("1.0.0"));
        assert_eq!(failures.len(), 1);
        assert!(matches!(&failures[0], CliError::ProviderLoad { provider, .. } if provider == "broken"));
    }

    #[test]
    fn test_register_adds_forwarding_subcommands() {
        let provider = ExternalProvider::new(
            "pkg",
            None,
            PathBuf::from("/bin/true"),
            vec![ExternalCommand {
                name: "gif".into(),
                description: "Convert to GIF".into(),
                leading_args: vec!["gif".into()],
            }],
        );
        let mut subcommands = Subcommands::new();
        provider.register_commands(&mut subcommands).unwrap();
        assert_eq!(subcommands.len(), 1);
    }
}
