//! Codec configuration: Sieve parameter names, separators and operator overrides.
//!
//! ```toml
//! [sieve]
//! filters = "filters"
//! clause_separator = ";"
//!
//! [operators]
//! EQUALS = "eq"
//! REGEX = "~="
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CodecError, Result};
use crate::operators::OperatorTable;
use crate::sieve::SieveCodec;

/// Names and separators of the Sieve query-string grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConstants {
    pub page: String,
    pub page_size: String,
    pub filters: String,
    pub sorts: String,
    /// Separates filter clauses and sort items
    pub clause_separator: String,
    /// Separates grouped field names
    pub field_separator: String,
    /// Separates values of one clause
    pub value_separator: String,
}

impl Default for SieveConstants {
    fn default() -> Self {
        Self {
            page: "page".to_string(),
            page_size: "pageSize".to_string(),
            filters: "Filters".to_string(),
            sorts: "Sorts".to_string(),
            clause_separator: ",".to_string(),
            field_separator: "|".to_string(),
            value_separator: "|".to_string(),
        }
    }
}

impl SieveConstants {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("page", &self.page),
            ("page_size", &self.page_size),
            ("filters", &self.filters),
            ("sorts", &self.sorts),
        ];
        for (key, name) in names {
            if name.is_empty() {
                return Err(CodecError::configuration(format!(
                    "parameter name '{key}' must not be empty"
                )));
            }
            if name.contains(['&', '=']) {
                return Err(CodecError::configuration(format!(
                    "parameter name '{key}' must not contain '&' or '=': {name}"
                )));
            }
        }

        let separators = [
            ("clause_separator", &self.clause_separator),
            ("field_separator", &self.field_separator),
            ("value_separator", &self.value_separator),
        ];
        for (key, separator) in separators {
            if separator.is_empty() {
                return Err(CodecError::configuration(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Everything needed to build a codec, usually loaded from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub sieve: SieveConstants,
    /// Operator name -> token, replacing default tokens or adding new operators
    pub operators: IndexMap<String, String>,
}

impl CodecConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.sieve.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            overrides = config.operators.len(),
            "Loaded codec configuration"
        );
        Ok(config)
    }

    /// Default operator table with the configured overrides applied.
    pub fn operator_table(&self) -> OperatorTable {
        self.operators
            .iter()
            .fold(OperatorTable::default(), |table, (name, token)| {
                table.with_operator(name.as_str(), token.as_str())
            })
    }

    pub fn sieve_codec(&self) -> Result<SieveCodec> {
        SieveCodec::with_config(self.sieve.clone(), self.operator_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CodecConfig::from_toml_str("").unwrap();
        assert_eq!(config, CodecConfig::default());
        assert_eq!(config.sieve.filters, "Filters");
        assert_eq!(config.operator_table(), OperatorTable::default());
    }

    #[test]
    fn partial_sieve_section_keeps_other_defaults() {
        let config = CodecConfig::from_toml_str(
            r#"
            [sieve]
            filters = "filters"
            clause_separator = ";"
            "#,
        )
        .unwrap();
        assert_eq!(config.sieve.filters, "filters");
        assert_eq!(config.sieve.clause_separator, ";");
        assert_eq!(config.sieve.sorts, "Sorts");
        assert_eq!(config.sieve.value_separator, "|");
    }

    #[test]
    fn operator_overrides_keep_file_order() {
        let config = CodecConfig::from_toml_str(
            r#"
            [operators]
            EQUALS = "eq"
            REGEX = "~="
            "#,
        )
        .unwrap();
        let table = config.operator_table();
        assert_eq!(table.token("EQUALS"), Some("eq"));
        assert_eq!(table.iter().last(), Some(("REGEX", "~=")));
    }

    #[test]
    fn empty_separator_is_rejected() {
        let err = CodecConfig::from_toml_str("[sieve]\nvalue_separator = \"\"").unwrap_err();
        assert!(matches!(err, CodecError::Configuration(_)));
    }

    #[test]
    fn parameter_name_with_delimiter_is_rejected() {
        let err = CodecConfig::from_toml_str("[sieve]\npage = \"p=1\"").unwrap_err();
        assert!(matches!(err, CodecError::Configuration(_)));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let err = CodecConfig::from_toml_str("[sieve\n").unwrap_err();
        assert!(matches!(err, CodecError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sieve]\npage_size = \"size\"").unwrap();

        let config = CodecConfig::load(file.path()).unwrap();
        assert_eq!(config.sieve.page_size, "size");

        let codec = config.sieve_codec().unwrap();
        assert_eq!(codec.constants().page_size, "size");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CodecConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, CodecError::Io(_)));
    }
}
