//! `rustbot config`: show the settings in effect

use std::io::Write;

use rustbot_config::ApplicationConfig;

/// Print `config` as TOML, after file and environment overrides
///
/// # Errors
///
/// Returns error if the configuration cannot be rendered or written
pub fn run<W: Write>(config: &ApplicationConfig, out: &mut W) -> anyhow::Result<()> {
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}
