//! Format-agnostic configuration loading

use crate::{Error, Result, SitePath};
use serde::de::DeserializeOwned;

/// Format-agnostic configuration loader.
///
/// Detects the format from the file extension and deserializes
/// transparently. Used by the configuration store for the on-disk
/// config source; the rest of the system works with the loaded tree.
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Create a new ConfigLoader.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file into a typed value.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &SitePath) -> Result<T> {
        let content = std::fs::read_to_string(path.to_native())?;
        let extension = path.extension().unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Load configuration from a file into a raw JSON tree.
    ///
    /// This is the form the configuration store validates and merges;
    /// typed decoding happens after schema defaulting.
    pub fn load_value(&self, path: &SitePath) -> Result<serde_json::Value> {
        self.load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_into_value() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "incremental = true\n[site]\ntitle = \"Blog\"\n").unwrap();

        let loader = ConfigLoader::new();
        let value = loader.load_value(&SitePath::new(&file)).unwrap();
        assert_eq!(value["incremental"], true);
        assert_eq!(value["site"]["title"], "Blog");
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"incremental": false}"#).unwrap();
        let yaml = dir.path().join("config.yml");
        std::fs::write(&yaml, "incremental: true\n").unwrap();

        let loader = ConfigLoader::new();
        let from_json = loader.load_value(&SitePath::new(&json)).unwrap();
        assert_eq!(from_json["incremental"], false);
        let from_yaml = loader.load_value(&SitePath::new(&yaml)).unwrap();
        assert_eq!(from_yaml["incremental"], true);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.ini");
        std::fs::write(&file, "x=1").unwrap();

        let loader = ConfigLoader::new();
        let err = loader.load_value(&SitePath::new(&file)).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn parse_error_carries_path_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "not [valid toml").unwrap();

        let loader = ConfigLoader::new();
        let err = loader.load_value(&SitePath::new(&file)).unwrap_err();
        match err {
            Error::ConfigParse { format, .. } => assert_eq!(format, "TOML"),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }
}
