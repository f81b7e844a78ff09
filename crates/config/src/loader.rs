use crate::{ConfigError, DslConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names to search for, in order of preference
pub const CONFIG_FILES: &[&str] = &[
    ".graphql-dsl.yml",
    ".graphql-dsl.yaml",
    ".graphql-dsl.json",
    ".graphql-dsl.toml",
];

/// Find a config file by walking up the directory tree from `start_dir`.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        if let Some(found) = CONFIG_FILES
            .iter()
            .map(|file_name| current_dir.join(file_name))
            .find(|candidate| candidate.is_file())
        {
            tracing::info!(path = %found.display(), checked_dirs, "Found config file");
            return Ok(Some(found));
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            return Ok(None);
        }
    }
}

/// Load and validate a config file, detecting the format by extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<DslConfig> {
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        url = %config.endpoint.url,
        introspection = config.schema.is_introspection(),
        scalars = config.scalars.len(),
        "Config loaded"
    );
    Ok(config)
}

/// Parse and validate config text. `path` selects the format and labels errors.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<DslConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    tracing::debug!(extension, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => parse_with(path, "YAML", || serde_saphyr::from_str(contents))?,
        "json" => parse_with(path, "JSON", || serde_json::from_str(contents))?,
        "toml" => parse_with(path, "TOML", || toml::from_str(contents))?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    validate_config(&config, path)?;
    Ok(config)
}

fn parse_with<E: std::fmt::Display>(
    path: &Path,
    format: &str,
    parse: impl FnOnce() -> std::result::Result<DslConfig, E>,
) -> Result<DslConfig> {
    parse().map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("{format} parse error: {e}"),
    })
}

fn validate_config(config: &DslConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    let url = config.endpoint.url.trim();
    if url.is_empty() {
        return Err(invalid("endpoint url is empty".into()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(invalid(format!(
            "endpoint url '{url}' must start with http:// or https://"
        )));
    }

    if let Some(schema_path) = config.schema.path() {
        if schema_path.trim().is_empty() {
            return Err(invalid("schema path is empty".into()));
        }
    }

    for scalar in config.scalars.keys() {
        if !is_graphql_name(scalar) {
            return Err(invalid(format!("'{scalar}' is not a valid scalar name")));
        }
    }

    for (type_name, wire, accessor) in config.rename_entries() {
        for name in [type_name, wire, accessor] {
            if !is_graphql_name(name) {
                return Err(invalid(format!(
                    "rename {type_name}.{wire} -> {accessor}: '{name}' is not a valid name"
                )));
            }
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}

/// `/[_A-Za-z][_0-9A-Za-z]*/`
fn is_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
