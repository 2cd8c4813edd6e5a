//! `plugins`: list the loaded command providers.

use clap::Args;

use crate::context::AppContext;
use crate::error::CliResult;
use crate::registry::ProviderInfo;
use crate::terminal;

#[derive(Args, Debug, Clone, Default)]
pub struct PluginsArgs {
    /// Print the provider list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Text printed for `providers` without `--json`.
#[must_use]
pub fn render_listing(providers: &[ProviderInfo]) -> Vec<String> {
    if providers.is_empty() {
        return vec!["No external plugins in env.".to_string()];
    }
    std::iter::once("Installed Plugins:".to_string())
        .chain(providers.iter().map(ToString::to_string))
        .collect()
}

pub fn run_plugins(args: PluginsArgs, ctx: &AppContext) -> CliResult<()> {
    let providers = ctx.registry().list_providers();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }
    let lines = render_listing(&providers);
    if let Some((heading, rest)) = lines.split_first() {
        terminal::print_heading(heading);
        rest.iter().for_each(|l| terminal::print_block(l));
    }
    for failure in ctx.registry().failures() {
        terminal::print_error(&failure.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing() {
        assert_eq!(render_listing(&[]), vec!["No external plugins in env."]);
    }

    #[test]
    fn test_listing_and_json_shape() {
        let providers = vec![
            ProviderInfo {
                name: "vidtoolz.builtin.clip".into(),
                hooks: vec!["register_commands".into()],
                version: None,
            },
            ProviderInfo {
                name: "vidtoolz-gif".into(),
                hooks: vec!["register_commands".into()],
                version: Some("0.3.1".into()),
            },
        ];
        let lines = render_listing(&providers);
        assert_eq!(lines[0], "Installed Plugins:");
        assert_eq!(lines[1], "vidtoolz.builtin.clip [register_commands]");
        assert_eq!(lines[2], "vidtoolz-gif 0.3.1 [register_commands]");

        let json: serde_json::Value = serde_json::to_value(&providers).unwrap();
        assert!(json[0].get("version").is_none());
        assert_eq!(json[1]["version"], "0.3.1");
    }
}
