//! Configuration loading for the CLI

use std::path::Path;

use integration_places::PlacesConfig;

/// Environment variable prefix (e.g. `MAPS_API_KEY`, `MAPS_REGION`)
pub const ENV_PREFIX: &str = "MAPS";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "maps";

/// Load places configuration from an optional file plus `MAPS_*` variables
///
/// An explicit `path` must exist; the default `maps.toml` is optional.
pub fn load(path: Option<&Path>) -> Result<PlacesConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        // Override with environment variables (e.g., MAPS_API_KEY)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    builder.build()?.try_deserialize()
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(
    mut config: PlacesConfig,
    region: Option<String>,
    language: Option<String>,
) -> PlacesConfig {
    if let Some(region) = region {
        config.region = region;
    }
    if let Some(language) = language {
        config.language = language;
    }
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_values_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
api_key = "from-file"
region = "CO"
language = "es"
max_requests_per_second = 10
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.region, "CO");
        assert_eq!(config.language, "es");
        assert_eq!(config.max_requests_per_second, 10);
        assert_eq!(config.geocode_cache_ttl_hours, 24);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load(Some(Path::new("/nonexistent/maps.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_replace_region_and_language() {
        let config = apply_overrides(PlacesConfig::default(), Some("CO".to_string()), None);
        assert_eq!(config.region, "CO");
        assert_eq!(config.language, "en");
    }
}
