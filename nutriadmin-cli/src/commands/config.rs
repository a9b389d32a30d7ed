use std::fs;
use std::io::Write;

use anyhow::{Context as _, Result, bail};
use shared::config::ClientConfig;

/// Render the default configuration in `format` ("yaml" or "json").
///
/// # Errors
/// Returns an error if the format is unsupported or serialization fails.
pub fn render_config(format: &str) -> Result<(&'static str, String)> {
    let config = ClientConfig::with_defaults();
    Ok(match format {
        "yaml" => ("config.yaml", serde_yml::to_string(&config)?),
        "json" => ("config.json", serde_json::to_string_pretty(&config)?),
        _ => bail!("Unsupported format. Use 'yaml' or 'json'."),
    })
}

/// Generates a configuration file in the specified format.
///
/// # Arguments
/// * `format` - The format of the configuration file ("yaml" or "json").
///
/// # Errors
/// Returns an error if the format is unsupported or if writing the file fails.
pub fn generate_config(format: &str) -> Result<()> {
    let (file_name, serialized) = render_config(format)?;

    let mut file =
        fs::File::create(file_name).with_context(|| format!("failed to create {file_name}"))?;
    file.write_all(serialized.as_bytes())?;

    println!("Configuration file '{file_name}' generated successfully.");
    Ok(())
}
