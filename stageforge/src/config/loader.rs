//! Loading stages from JSON and YAML documents.

use crate::core::Arguments;
use crate::errors::{ConfigError, ForgeError, MalformedStageError, UnresolvedTargetError};
use crate::registry::Registry;
use crate::stages::{normalize, Stage};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON configuration format.
    Json,
    /// YAML configuration format.
    Yaml,
}

impl ConfigFormat {
    /// Determines the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedFormat` for anything but `.json`,
    /// `.yaml` and `.yml`.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// One stage entry as written in a document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageEntry {
    method: Option<String>,
    class: Option<String>,
    attribute: Option<String>,
    arguments: Option<serde_json::Value>,
}

type Document = serde_json::Map<String, serde_json::Value>;

/// Loads stages from a JSON or YAML file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Config` for an unsupported
/// extension or a bad document, `UnresolvedTarget` for an unknown class
/// and `MalformedStage` for an entry that is not a valid stage.
pub fn load_stages(path: impl AsRef<Path>, registry: &Registry) -> Result<Vec<Stage>, ForgeError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    debug!(path = %path.display(), format = %format, "Loading stage configuration");
    parse_stages(&content, format, registry)
}

/// Parses stages from a document string.
///
/// # Errors
///
/// See [`load_stages`].
pub fn parse_stages(
    content: &str,
    format: ConfigFormat,
    registry: &Registry,
) -> Result<Vec<Stage>, ForgeError> {
    let document = parse_document(content, format)?;
    document
        .into_iter()
        .enumerate()
        .map(|(position, (name, value))| {
            build_stage(&name, value, registry).map_err(|err| err.at(position))
        })
        .collect()
}

fn parse_document(content: &str, format: ConfigFormat) -> Result<Document, ConfigError> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::parse(format.to_string(), e))
        }
        ConfigFormat::Yaml => parse_yaml(content),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str) -> Result<Document, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Document::new());
    }
    serde_yaml::from_str(content).map_err(|e| ConfigError::parse("YAML", e))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str) -> Result<Document, ConfigError> {
    Err(ConfigError::parse("YAML", "YAML support not enabled. Enable the 'yaml' feature."))
}

fn build_stage(
    name: &str,
    value: serde_json::Value,
    registry: &Registry,
) -> Result<Stage, ForgeError> {
    let entry: StageEntry =
        serde_json::from_value(value).map_err(|e| ConfigError::invalid_entry(name, e.to_string()))?;

    let type_reference = entry
        .class
        .as_deref()
        .map(|class| {
            registry
                .type_ref(class)
                .cloned()
                .ok_or_else(|| UnresolvedTargetError::new(class, "class is not a registered type"))
        })
        .transpose()?;

    let arguments = match entry.arguments {
        None | Some(serde_json::Value::Null) => Arguments::new(),
        Some(value) => Arguments::from_json(value)
            .ok_or_else(|| ConfigError::invalid_entry(name, "arguments must be a mapping"))?,
    };

    if entry.method.is_none() && type_reference.is_none() {
        return Err(MalformedStageError::new("entry needs a method or a class")
            .with_declaration(name)
            .into());
    }

    let stage = Stage::from_parts(entry.attribute, entry.method, type_reference, arguments);
    normalize(stage).map_err(|err| ForgeError::from(err.with_declaration(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::testing::{sample_class, sample_registry};
    use pretty_assertions::assert_eq;
    #[cfg(feature = "yaml")]
    use std::io::Write;

    const JSON_DOC: &str = r#"{
        "step1": {"method": "method", "class": "SampleClass"},
        "step2": {"attribute": "object", "class": "SampleClass"},
        "step3": {"attribute": "result1", "method": "method", "class": "SampleClass",
                  "arguments": {"param2": "there!"}},
        "step4": {"method": "host_method"},
        "step5": {"method": "host_method", "arguments": {"param1": "Hello", "param2": "there"}}
    }"#;

    #[cfg(feature = "yaml")]
    const YAML_DOC: &str = "
zeta:
  method: greet
alpha:
  attribute: total
  method: add
  arguments:
    a: 2
    b: 3
";

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")).unwrap(), ConfigFormat::Yaml);
        assert!(ConfigFormat::from_path(Path::new("a.toml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_parse_json_entries() {
        let registry = sample_registry();
        let stages = parse_stages(JSON_DOC, ConfigFormat::Json, &registry).unwrap();
        let sample = registry.type_ref("SampleClass").unwrap().clone();

        assert_eq!(stages.len(), 5);
        assert_eq!(stages[0], Stage::call("method").on_type(sample.clone()));
        assert_eq!(stages[1], Stage::construct(sample.clone()).store_as("object"));
        assert_eq!(
            stages[2],
            Stage::call("method")
                .store_as("result1")
                .on_type(sample)
                .with_arguments(Arguments::new().with("param2", "there!"))
        );
        assert_eq!(stages[3], Stage::call("host_method"));
        assert_eq!(stages[4].arguments().get("param1"), Some(&Value::from("Hello")));
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_yaml_keeps_document_order() {
        let stages = parse_stages(YAML_DOC, ConfigFormat::Yaml, &Registry::new()).unwrap();
        let methods: Vec<_> = stages.iter().map(|s| s.method_name().unwrap()).collect();

        assert_eq!(methods, vec!["greet", "add"]);
        assert_eq!(stages[1].attribute_name(), Some("total"));
        assert_eq!(stages[1].arguments().get("b"), Some(&Value::from(3)));
    }

    #[test]
    fn test_unknown_class_is_unresolved() {
        let doc = r#"{"s": {"class": "Nope"}}"#;
        let err = parse_stages(doc, ConfigFormat::Json, &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::UnresolvedTarget(_)));
        assert_eq!(err.stage_position(), Some(0));
    }

    #[test]
    fn test_entry_without_target_is_malformed() {
        let doc = r#"{"ok": {"method": "greet"}, "bad": {"attribute": "x"}}"#;
        let err = parse_stages(doc, ConfigFormat::Json, &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::MalformedStage(_)));
        assert_eq!(err.stage_position(), Some(1));
    }

    #[test]
    fn test_unknown_field_is_invalid_entry() {
        let doc = r#"{"s": {"method": "greet", "colour": "red"}}"#;
        let err = parse_stages(doc, ConfigFormat::Json, &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::Config(ConfigError::InvalidEntry { .. })));
    }

    #[test]
    fn test_arguments_must_be_mapping() {
        let doc = r#"{"s": {"method": "greet", "arguments": [1, 2]}}"#;
        let err = parse_stages(doc, ConfigFormat::Json, &Registry::new()).unwrap_err();
        assert!(err.to_string().contains("arguments must be a mapping"));
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_stages("{not json", ConfigFormat::Json, &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_yaml_sequence_is_parse_error() {
        let err = parse_stages("- a\n- b\n", ConfigFormat::Yaml, &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_empty_yaml_document() {
        let stages = parse_stages("", ConfigFormat::Yaml, &Registry::new()).unwrap();
        assert!(stages.is_empty());
    }

    #[test]
    #[cfg(feature = "yaml")]
    fn test_load_stages_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(YAML_DOC.as_bytes()).unwrap();

        let stages = load_stages(file.path(), &Registry::new()).unwrap();
        assert_eq!(stages.len(), 2);
    }

    #[test]
    fn test_load_stages_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_stages(dir.path().join("missing.json"), &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::Io(_)));
    }

    #[test]
    fn test_load_stages_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let err = load_stages(file.path(), &Registry::new()).unwrap_err();
        assert!(matches!(err, ForgeError::Config(ConfigError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_class_reference_is_registry_type() {
        let registry = Registry::new().with_type(sample_class());
        let doc = r#"{"s": {"class": "SampleClass"}}"#;
        let stages = parse_stages(doc, ConfigFormat::Json, &registry).unwrap();
        assert_eq!(stages[0].type_reference(), registry.type_ref("SampleClass"));
    }
}
