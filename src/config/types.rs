use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::plural::PluralRule;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "storage.directory")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorSettings {
    /// Locale tag, also the catalog file stem (e.g. "en", "pt-BR").
    pub locale: String,

    /// Explicit plural rule name. Derived from `locale` when unset.
    pub plural_rule: Option<String>,

    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Catalog directory, relative to the project root unless absolute.
    pub directory: String,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self { locale: "en".to_string(), plural_rule: None, storage: StorageConfig::default() }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { directory: "locales".to_string() }
    }
}

impl TranslatorSettings {
    /// # Errors
    /// - Required field is empty
    /// - Locale contains a path separator
    /// - Unknown plural rule name
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locale.is_empty() {
            errors.push(ValidationError::new(
                "locale",
                "The locale cannot be empty. Example: \"en\" or \"pt-BR\"",
            ));
        } else if self.locale.contains(['/', '\\']) || self.locale.starts_with('.') {
            errors.push(ValidationError::new(
                "locale",
                format!("'{}' is not a valid locale. It is used as a file name", self.locale),
            ));
        }

        if let Some(name) = &self.plural_rule
            && PluralRule::from_name(name).is_none()
        {
            let known = PluralRule::ALL.iter().map(|rule| rule.name()).collect::<Vec<_>>();
            errors.push(ValidationError::new(
                "pluralRule",
                format!("Unknown plural rule '{name}'. Expected one of: {}", known.join(", ")),
            ));
        }

        if self.storage.directory.is_empty() {
            errors.push(ValidationError::new(
                "storage.directory",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The configured plural rule, or the one derived from the locale.
    ///
    /// An unknown rule name also falls back to the locale; `validate` reports it.
    #[must_use]
    pub fn resolve_plural_rule(&self) -> PluralRule {
        self.plural_rule
            .as_deref()
            .and_then(PluralRule::from_name)
            .unwrap_or_else(|| PluralRule::for_locale(&self.locale))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_default_settings() {
        let settings = TranslatorSettings::default();

        expect_that!(settings.locale, eq("en"));
        expect_that!(settings.plural_rule, none());
        expect_that!(settings.storage.directory, eq("locales"));
        expect_that!(settings.validate(), ok(anything()));
    }

    #[googletest::test]
    fn test_deserialize_partial_settings() {
        let settings: TranslatorSettings =
            serde_json::from_str(r#"{"locale": "cs", "storage": {}}"#).unwrap();

        expect_that!(settings.locale, eq("cs"));
        expect_that!(settings.storage.directory, eq("locales"));
        expect_that!(settings.resolve_plural_rule(), eq(PluralRule::Czech));
    }

    #[googletest::test]
    fn test_deserialize_camel_case() {
        let settings: TranslatorSettings = serde_json::from_str(
            r#"{"locale": "de", "pluralRule": "Single", "storage": {"directory": "i18n"}}"#,
        )
        .unwrap();

        expect_that!(settings.plural_rule, some(eq("Single")));
        expect_that!(settings.resolve_plural_rule(), eq(PluralRule::Single));
        expect_that!(settings.storage.directory, eq("i18n"));
    }

    #[rstest]
    #[case::empty_locale("", None, "locales", "locale")]
    #[case::locale_with_slash("../en", None, "locales", "locale")]
    #[case::hidden_locale(".en", None, "locales", "locale")]
    #[case::unknown_rule("en", Some("klingon"), "locales", "pluralRule")]
    #[case::empty_directory("en", None, "", "storage.directory")]
    fn test_validate_rejects(
        #[case] locale: &str,
        #[case] plural_rule: Option<&str>,
        #[case] directory: &str,
        #[case] field_path: &str,
    ) {
        let settings = TranslatorSettings {
            locale: locale.to_string(),
            plural_rule: plural_rule.map(str::to_string),
            storage: StorageConfig { directory: directory.to_string() },
        };

        let errors = settings.validate().unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().map(|e| e.field_path.as_str()), Some(field_path));
    }

    #[googletest::test]
    fn test_validate_collects_all_errors() {
        let settings = TranslatorSettings {
            locale: String::new(),
            plural_rule: Some("nope".to_string()),
            storage: StorageConfig { directory: String::new() },
        };

        let error = ConfigError::ValidationErrors(settings.validate().unwrap_err());

        expect_that!(
            error.to_string(),
            all!(
                contains_substring("1. locale"),
                contains_substring("2. pluralRule"),
                contains_substring("3. storage.directory")
            )
        );
    }

    #[googletest::test]
    fn test_unknown_rule_falls_back_to_locale() {
        let settings = TranslatorSettings {
            locale: "ru".to_string(),
            plural_rule: Some("nope".to_string()),
            ..TranslatorSettings::default()
        };

        expect_that!(settings.resolve_plural_rule(), eq(PluralRule::Russian));
    }
}
