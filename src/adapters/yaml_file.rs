// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML manifest adapter.
//!
//! This module provides a YAML implementation of `ManifestParser` and
//! `ManifestFile`, which loads, parses and expands a manifest from disk.

use crate::adapters::display_name;
use crate::domain::{ConfigMap, ConfigValue, Expander, Manifest, ManifestError, Result};
use crate::ports::ManifestParser;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for manifest files (10MB)
const MAX_MANIFEST_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "manifest-file";

/// YAML parser implementation.
///
/// Produces the raw document tree. Merge keys (`<<: *anchor`) are applied.
/// Integer and boolean keys are turned into strings; floating point keys are
/// rejected, since their `.` would later be read as a segment separator. Tags
/// are dropped and their values kept.
///
/// # Examples
///
/// ```rust
/// use fnmanifest::adapters::YamlParser;
/// use fnmanifest::domain::ConfigValue;
/// use fnmanifest::ports::ManifestParser;
///
/// let parser = YamlParser::new();
/// let parsed = parser.parse("Environment.Variables.STAGE: prod").unwrap();
/// let map = parsed.as_mapping().unwrap();
/// assert_eq!(map.get("Environment.Variables.STAGE"), Some(&ConfigValue::from("prod")));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn convert(value: serde_yaml::Value) -> Result<ConfigValue> {
        Ok(match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else if n.is_f64() {
                    ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
                } else {
                    return Err(ManifestError::ParseError {
                        message: format!("Integer out of range: {}", n),
                        source: None,
                    });
                }
            }
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(seq) => ConfigValue::Sequence(
                seq.into_iter()
                    .map(Self::convert)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut result = ConfigMap::new();
                for (key, val) in map {
                    result.insert(Self::convert_key(key)?, Self::convert(val)?);
                }
                ConfigValue::Mapping(result)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value)?,
        })
    }

    fn convert_key(key: serde_yaml::Value) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) if !n.is_f64() => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Tagged(tagged) => Self::convert_key(tagged.value),
            other => Err(ManifestError::ParseError {
                message: format!("Unsupported mapping key: {:?}", other),
                source: None,
            }),
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let mut value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ManifestError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        value.apply_merge().map_err(|e| ManifestError::ParseError {
            message: format!("Failed to apply YAML merge keys: {}", e),
            source: Some(Box::new(e)),
        })?;

        Self::convert(value)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Renders an expanded document back to YAML text.
///
/// # Examples
///
/// ```rust
/// use fnmanifest::adapters::yaml_file::to_yaml_string;
/// use fnmanifest::domain::ConfigValue;
///
/// let text = to_yaml_string(&ConfigValue::mapping([("a", 1)])).unwrap();
/// assert_eq!(text, "a: 1\n");
/// ```
pub fn to_yaml_string(value: &ConfigValue) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| ManifestError::ParseError {
        message: format!("Failed to render YAML: {}", e),
        source: Some(Box::new(e)),
    })
}

/// A manifest loaded from a file.
///
/// The file is parsed and expanded eagerly, so a `ManifestFile` always holds a
/// fully expanded manifest.
///
/// # Examples
///
/// ```rust,no_run
/// use fnmanifest::adapters::ManifestFile;
///
/// let file = ManifestFile::from_file("manifest.yaml").unwrap();
/// let function = file.manifest().function_configuration().unwrap();
/// println!("deploying {}", function.function_name());
/// ```
pub struct ManifestFile {
    /// Canonical path to the manifest file
    file_path: PathBuf,
    /// Parser for the file's format
    parser: Box<dyn ManifestParser>,
    /// Expander applied after parsing
    expander: Expander,
    /// The expanded manifest
    manifest: Manifest,
}

impl ManifestFile {
    /// Loads a YAML manifest with the default expander.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_parser(path, Box::new(YamlParser::new()), Expander::new())
    }

    /// Loads a manifest with a specific parser and expander.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the manifest file
    /// * `parser` - Parser for the file's format
    /// * `expander` - Expander applied to the parsed document
    pub fn with_parser<P: AsRef<Path>>(
        path: P,
        parser: Box<dyn ManifestParser>,
        expander: Expander,
    ) -> Result<Self> {
        let file_path = path.as_ref();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| ManifestError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Invalid or inaccessible path: {}", display_name(file_path)),
            source: Some(Box::new(e)),
        })?;

        if let Some(extension) = canonical_path.extension().and_then(|e| e.to_str()) {
            if !parser.supports_extension(extension) {
                tracing::warn!(
                    "Manifest '{}' has extension '{}', which the parser does not list",
                    display_name(&canonical_path),
                    extension
                );
            }
        }

        let manifest = read_manifest(&canonical_path, parser.as_ref(), &expander)?;

        Ok(Self {
            file_path: canonical_path,
            parser,
            expander,
            manifest,
        })
    }

    /// Returns the path to the manifest file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the expanded manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Consumes the file, returning the expanded manifest.
    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Re-reads the file.
    ///
    /// On error the previously loaded manifest is kept.
    pub fn reload(&mut self) -> Result<()> {
        self.manifest = read_manifest(&self.file_path, self.parser.as_ref(), &self.expander)?;
        tracing::debug!("Reloaded manifest '{}'", display_name(&self.file_path));
        Ok(())
    }
}

impl fmt::Debug for ManifestFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestFile")
            .field("file_path", &self.file_path)
            .field("expander", &self.expander)
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

fn read_manifest(
    path: &Path,
    parser: &dyn ManifestParser,
    expander: &Expander,
) -> Result<Manifest> {
    // Check file size before reading to prevent DoS via large files
    let metadata = fs::metadata(path).map_err(|e| ManifestError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read file metadata: {}", display_name(path)),
        source: Some(Box::new(e)),
    })?;

    if metadata.len() > MAX_MANIFEST_FILE_SIZE {
        return Err(ManifestError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Manifest file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_MANIFEST_FILE_SIZE
            ),
            source: None,
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ManifestError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!("Failed to read manifest file: {}", display_name(path)),
        source: Some(Box::new(e)),
    })?;

    let raw = parser.parse(&content)?;
    let manifest = Manifest::from_raw_with(raw, expander)?;
    tracing::debug!(
        "Loaded manifest '{}' with {} top-level sections",
        display_name(path),
        manifest.root().len()
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn manifest_file(content: &str) -> NamedTempFile {
        let mut temp_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_yaml_parser_keeps_dotted_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("a.b: 1\nc: two").unwrap();
        let map = result.as_mapping().unwrap();

        assert_eq!(map.get("a.b"), Some(&ConfigValue::Integer(1)));
        assert_eq!(map.get("c"), Some(&ConfigValue::from("two")));
    }

    #[test]
    fn test_yaml_parser_preserves_key_order() {
        let parser = YamlParser::new();
        let result = parser.parse("z: 1\na: 2\nm: 3").unwrap();
        let keys: Vec<_> = result.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_yaml_parser_scalar_types() {
        let parser = YamlParser::new();
        let yaml = r#"
string_value: hello
int_value: -42
float_value: 2.5
bool_value: true
null_value: null
quoted_number: "42"
"#;
        let result = parser.parse(yaml).unwrap();
        let map = result.as_mapping().unwrap();

        assert_eq!(map.get("string_value"), Some(&ConfigValue::from("hello")));
        assert_eq!(map.get("int_value"), Some(&ConfigValue::Integer(-42)));
        assert_eq!(map.get("float_value"), Some(&ConfigValue::Float(2.5)));
        assert_eq!(map.get("bool_value"), Some(&ConfigValue::Bool(true)));
        assert_eq!(map.get("null_value"), Some(&ConfigValue::Null));
        assert_eq!(map.get("quoted_number"), Some(&ConfigValue::from("42")));
    }

    #[test]
    fn test_yaml_parser_sequences() {
        let parser = YamlParser::new();
        let result = parser.parse("servers:\n  - one\n  - two\n").unwrap();
        let servers = result.as_mapping().unwrap().get("servers").unwrap();
        assert_eq!(servers, &ConfigValue::sequence(["one", "two"]));
    }

    #[test]
    fn test_yaml_parser_scalar_keys_become_strings() {
        let parser = YamlParser::new();
        let result = parser.parse("1: one\ntrue: yes").unwrap();
        let map = result.as_mapping().unwrap();
        assert_eq!(map.get("1"), Some(&ConfigValue::from("one")));
        assert_eq!(map.get("true"), Some(&ConfigValue::from("yes")));
    }

    #[test]
    fn test_yaml_parser_rejects_float_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("1.5: one\n");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_applies_merge_keys() {
        let parser = YamlParser::new();
        let yaml = r#"
base: &base
  Runtime: python3.12
  Timeout: 30
FunctionConfiguration:
  <<: *base
  FunctionName: resize
  Timeout: 60
"#;
        let result = parser.parse(yaml).unwrap();
        let function = result
            .as_mapping()
            .and_then(|m| m.get("FunctionConfiguration"))
            .and_then(ConfigValue::as_mapping)
            .unwrap();

        assert!(!function.contains_key("<<"));
        assert_eq!(function.len(), 3);
        assert_eq!(function.get("Runtime"), Some(&ConfigValue::from("python3.12")));
        assert_eq!(function.get("FunctionName"), Some(&ConfigValue::from("resize")));
        // keys written next to the merge key win
        assert_eq!(function.get("Timeout"), Some(&ConfigValue::Integer(60)));
    }

    #[test]
    fn test_yaml_parser_rejects_invalid_merge() {
        let parser = YamlParser::new();
        let result = parser.parse("a:\n  <<: 1\n");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_rejects_complex_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("? [a, b]\n: value\n");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_unwraps_tags() {
        let parser = YamlParser::new();
        let result = parser.parse("value: !Ref Bucket").unwrap();
        let map = result.as_mapping().unwrap();
        assert_eq!(map.get("value"), Some(&ConfigValue::from("Bucket")));
    }

    #[test]
    fn test_yaml_parser_rejects_huge_integers() {
        let parser = YamlParser::new();
        let result = parser.parse("big: 18446744073709551615");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        let parser = YamlParser::new();
        assert_eq!(parser.parse("").unwrap(), ConfigValue::Null);
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let parser = YamlParser::new();
        let result = parser.parse("invalid: yaml: content:");
        assert!(result.is_err());
    }

    #[test]
    fn test_yaml_parser_duplicate_keys() {
        let parser = YamlParser::new();
        let result = parser.parse("a.b: 1\na.b: 2\n");
        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::default();
        let extensions = parser.supported_extensions();

        assert_eq!(extensions.len(), 2);
        assert!(parser.supports_extension("yaml"));
        assert!(parser.supports_extension("YML"));
        assert!(!parser.supports_extension("toml"));
    }

    #[test]
    fn test_to_yaml_string_nested() {
        let raw = YamlParser::new().parse("a.b: 1\na.c: [x, y]\n").unwrap();
        let expanded = crate::domain::expand(raw).unwrap();
        let text = to_yaml_string(&expanded).unwrap();

        let reparsed = YamlParser::new().parse(&text).unwrap();
        assert_eq!(reparsed, expanded);
        assert!(text.starts_with("a:\n"));
    }

    #[test]
    fn test_manifest_file_from_file() {
        let temp_file = manifest_file(
            "FunctionConfiguration.FunctionName: resize\nFunctionConfiguration.MemorySize: 256\n",
        );

        let file = ManifestFile::from_file(temp_file.path()).unwrap();
        let function = file.manifest().function_configuration().unwrap();

        assert_eq!(function.function_name(), "resize");
        assert_eq!(
            function.parameters().get("MemorySize"),
            Some(&ConfigValue::Integer(256))
        );
    }

    #[test]
    fn test_manifest_file_path_is_canonical() {
        let temp_file = manifest_file("a: 1\n");
        let file = ManifestFile::from_file(temp_file.path()).unwrap();
        assert_eq!(file.file_path(), temp_file.path().canonicalize().unwrap());
    }

    #[test]
    fn test_manifest_file_reload() {
        let temp_file = manifest_file("FunctionConfiguration.FunctionName: first\n");
        let path = temp_file.path().to_path_buf();

        let mut file = ManifestFile::from_file(&path).unwrap();
        assert_eq!(
            file.manifest().function_configuration().unwrap().function_name(),
            "first"
        );

        fs::write(&path, "FunctionConfiguration.FunctionName: second\n").unwrap();
        file.reload().unwrap();

        assert_eq!(
            file.manifest().function_configuration().unwrap().function_name(),
            "second"
        );
    }

    #[test]
    fn test_manifest_file_reload_keeps_previous_on_error() {
        let temp_file = manifest_file("FunctionConfiguration.FunctionName: first\n");
        let path = temp_file.path().to_path_buf();
        let mut file = ManifestFile::from_file(&path).unwrap();

        fs::write(&path, "a: 1\na.b: 2\n").unwrap();
        assert!(matches!(
            file.reload(),
            Err(ManifestError::StructuralConflict { .. })
        ));
        assert_eq!(
            file.manifest().function_configuration().unwrap().function_name(),
            "first"
        );
    }

    #[test]
    fn test_manifest_file_expansion_error() {
        let temp_file = manifest_file("FunctionConfiguration..FunctionName: x\n");
        let result = ManifestFile::from_file(temp_file.path());
        assert!(matches!(result, Err(ManifestError::MalformedKey { .. })));
    }

    #[test]
    fn test_manifest_file_custom_expander() {
        let temp_file = manifest_file("a:\n  b:\n    c: 1\n");
        let result = ManifestFile::with_parser(
            temp_file.path(),
            Box::new(YamlParser::new()),
            Expander::new().with_max_depth(1),
        );
        assert!(matches!(result, Err(ManifestError::NestingTooDeep { .. })));
    }

    #[test]
    fn test_manifest_file_nonexistent() {
        let result = ManifestFile::from_file("/nonexistent/path/to/manifest.yaml");
        assert!(matches!(result, Err(ManifestError::SourceError { .. })));
    }

    #[test]
    fn test_manifest_file_into_manifest() {
        let temp_file = manifest_file("Environments: []\n");
        let manifest = ManifestFile::from_file(temp_file.path()).unwrap().into_manifest();
        assert!(manifest.environments().unwrap().is_empty());
    }
}
