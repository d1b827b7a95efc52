// crates/i18n-gen-core/src/catalog.rs
// ============================================================================
// Module: Catalog Loading
// Description: Discovery, bounded reads, and parsing of per-locale catalogs.
// Purpose: Produce a validated, locale-sorted set of message catalogs.
// Dependencies: serde, serde_yaml
// ============================================================================

//! ## Overview
//! A catalog is one YAML file per locale named `<tag>.<suffix>` (by default
//! `en.i18n.yaml`). Files are discovered by a sorted recursive walk below
//! `root/base_path` that never follows symbolic links. Every read is bounded
//! and the number of files is capped before anything is parsed.
//!
//! ```yaml
//! messages:
//!   my_greeting:
//!     template: "Hello {{ .Name }}! You have {{ .Count }} messages."
//!     variables:
//!       count: int
//!     custom_templates:
//!       - expression: "count == 0"
//!         template: "Hello {{ .Name }}! You have no messages."
//! ```
//!
//! `custom_templates` may also be written as a mapping from expression to
//! template; declaration order is preserved either way.

use std::collections::BTreeMap;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_yaml::Mapping;
use serde_yaml::Value;

use crate::error::GenError;
use crate::error::TemplateRef;
use crate::locale::LocaleTag;
use crate::schema;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default catalog file suffix.
pub const DEFAULT_CATALOG_SUFFIX: &str = "i18n.yaml";
/// Default maximum catalog file size in bytes.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Default maximum number of catalog files.
pub const DEFAULT_MAX_FILES: usize = 256;

// ============================================================================
// SECTION: Catalog Types
// ============================================================================

/// Alternate template selected by a guard expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConditionalTemplate {
    /// Guard expression source.
    pub expression: String,
    /// Template used when the guard holds.
    pub template: String,
}

/// One message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Default template.
    pub template: String,
    /// Declared variables mapped to their type tokens.
    pub variables: BTreeMap<String, String>,
    /// Conditional templates in declaration order.
    pub custom_templates: Vec<ConditionalTemplate>,
}

impl Message {
    /// Iterates the default template followed by each conditional template.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateRef, &str)> + '_ {
        std::iter::once((TemplateRef::Default, self.template.as_str())).chain(
            self.custom_templates.iter().enumerate().map(|(index, custom)| {
                (
                    TemplateRef::Conditional {
                        index,
                        expression: custom.expression.clone(),
                    },
                    custom.template.as_str(),
                )
            }),
        )
    }
}

/// Parsed catalog for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Canonical locale of the catalog.
    pub locale: LocaleTag,
    /// Catalog file relative to the loader root, `/` separated.
    pub file: String,
    /// Messages keyed by message id.
    pub messages: BTreeMap<String, Message>,
    /// Raw document, kept for structural comparison.
    document: Value,
}

impl Catalog {
    /// Parses catalog YAML for `locale`; `file` labels errors.
    ///
    /// # Errors
    /// Returns [`GenError::Parse`] when the document is malformed.
    pub fn parse(file: &str, locale: LocaleTag, source: &str) -> Result<Self, GenError> {
        let parse_error = |message: String| GenError::Parse {
            file: file.to_string(),
            message,
        };
        let document: Value =
            serde_yaml::from_str(source).map_err(|err| parse_error(err.to_string()))?;
        let raw: RawCatalog = serde_yaml::from_value(document.clone())
            .map_err(|err| parse_error(err.to_string()))?;

        let mut messages = BTreeMap::new();
        for (id, message) in raw.messages {
            let custom_templates = match message.custom_templates {
                None => Vec::new(),
                Some(RawConditionals::List(list)) => list,
                Some(RawConditionals::Map(mapping)) => conditionals_from_mapping(&mapping)
                    .map_err(|detail| parse_error(format!("messages.{id}.custom_templates: {detail}")))?,
            };
            if let Some(duplicate) = first_duplicate_expression(&custom_templates) {
                return Err(parse_error(format!(
                    "messages.{id}.custom_templates: duplicate expression `{duplicate}`"
                )));
            }
            messages.insert(id, Message {
                template: message.template,
                variables: message.variables.unwrap_or_default(),
                custom_templates,
            });
        }

        Ok(Self {
            locale,
            file: file.to_string(),
            messages,
            document,
        })
    }

    /// Returns the raw YAML document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }
}

/// Catalogs of every locale, sorted by canonical locale tag.
///
/// # Invariants
/// - Locales are unique and strictly ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSet {
    /// Sorted catalogs.
    catalogs: Vec<Catalog>,
}

impl CatalogSet {
    /// Builds a set, sorting by locale and rejecting duplicate locales.
    ///
    /// # Errors
    /// Returns [`GenError::DuplicateLocale`] when two catalogs share a locale.
    pub fn new(mut catalogs: Vec<Catalog>) -> Result<Self, GenError> {
        catalogs.sort_by(|a, b| a.locale.cmp(&b.locale).then_with(|| a.file.cmp(&b.file)));
        for pair in catalogs.windows(2) {
            if pair[0].locale == pair[1].locale {
                return Err(GenError::DuplicateLocale {
                    locale: pair[0].locale.to_string(),
                    first: pair[0].file.clone(),
                    second: pair[1].file.clone(),
                });
            }
        }
        Ok(Self {
            catalogs,
        })
    }

    /// Checks every catalog's structure against the first.
    ///
    /// # Errors
    /// Returns [`GenError::SchemaMismatch`] at the first divergence.
    pub fn validate_schema(&self) -> Result<(), GenError> {
        schema::validate_catalogs(&self.catalogs)
    }

    /// Iterates catalogs in locale order.
    pub fn iter(&self) -> std::slice::Iter<'_, Catalog> {
        self.catalogs.iter()
    }

    /// Returns the reference (first) catalog.
    #[must_use]
    pub fn first(&self) -> Option<&Catalog> {
        self.catalogs.first()
    }

    /// Returns the catalog for `locale`.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&Catalog> {
        self.catalogs.iter().find(|catalog| catalog.locale.as_str() == locale)
    }

    /// Returns the number of catalogs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Returns true when no catalogs were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

impl<'a> IntoIterator for &'a CatalogSet {
    type IntoIter = std::slice::Iter<'a, Catalog>;
    type Item = &'a Catalog;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// SECTION: Raw Documents
// ============================================================================

/// Deserialized catalog document.
#[derive(Deserialize)]
struct RawCatalog {
    /// Messages keyed by id.
    #[serde(default)]
    messages: BTreeMap<String, RawMessage>,
}

/// Deserialized message entry.
#[derive(Deserialize)]
struct RawMessage {
    /// Default template.
    template: String,
    /// Optional declared variables.
    #[serde(default)]
    variables: Option<BTreeMap<String, String>>,
    /// Optional conditional templates in either accepted form.
    #[serde(default)]
    custom_templates: Option<RawConditionals>,
}

/// Accepted spellings of `custom_templates`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawConditionals {
    /// `[{expression, template}, ...]`.
    List(Vec<ConditionalTemplate>),
    /// `{expression: template, ...}`.
    Map(Mapping),
}

/// Converts the mapping form into ordered conditional templates.
fn conditionals_from_mapping(mapping: &Mapping) -> Result<Vec<ConditionalTemplate>, String> {
    mapping
        .iter()
        .map(|(key, value)| match (key.as_str(), value.as_str()) {
            (Some(expression), Some(template)) => Ok(ConditionalTemplate {
                expression: expression.to_string(),
                template: template.to_string(),
            }),
            _ => Err("expression keys and templates must be strings".to_string()),
        })
        .collect()
}

/// Returns the first expression declared twice.
fn first_duplicate_expression(custom_templates: &[ConditionalTemplate]) -> Option<&str> {
    custom_templates.iter().enumerate().find_map(|(index, custom)| {
        custom_templates[.. index]
            .iter()
            .any(|earlier| earlier.expression == custom.expression)
            .then_some(custom.expression.as_str())
    })
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Limits and naming used while discovering catalogs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// File suffix after the locale tag, without the leading dot.
    pub suffix: String,
    /// Maximum size of one catalog file in bytes.
    pub max_file_bytes: u64,
    /// Maximum number of catalog files.
    pub max_files: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_CATALOG_SUFFIX.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

/// Loads catalogs from a directory tree.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    /// Root that file labels are relative to.
    root: PathBuf,
    /// Discovery options.
    options: LoaderOptions,
}

impl CatalogLoader {
    /// Creates a loader rooted at `root` with default options.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            options: LoaderOptions::default(),
        }
    }

    /// Replaces the discovery options.
    #[must_use]
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the active options.
    #[must_use]
    pub const fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Loads and structurally validates every catalog under `base_path`.
    ///
    /// # Errors
    /// Returns [`GenError`] for filesystem, size, parse, locale, duplicate, or
    /// structure failures.
    pub fn load(&self, base_path: &Path) -> Result<CatalogSet, GenError> {
        let catalogs = self.load_unvalidated(base_path)?;
        catalogs.validate_schema()?;
        Ok(catalogs)
    }

    /// Loads catalogs without comparing their structure.
    ///
    /// # Errors
    /// Returns [`GenError`] for filesystem, size, parse, locale, or duplicate
    /// failures.
    pub fn load_unvalidated(&self, base_path: &Path) -> Result<CatalogSet, GenError> {
        let dir = self.root.join(base_path);
        let mut files = Vec::new();
        self.discover(&dir, &mut files)?;
        files.sort();

        let mut catalogs = Vec::with_capacity(files.len());
        for path in files {
            let label = self.label(&path);
            let tag = self.locale_of(&path).unwrap_or_default();
            let locale = LocaleTag::parse(&tag).map_err(|err| GenError::InvalidLocale {
                file: label.clone(),
                tag: tag.clone(),
                reason: err.to_string(),
            })?;
            let bytes = self.read_bounded(&path, &label)?;
            let source = String::from_utf8(bytes).map_err(|_| GenError::Parse {
                file: label.clone(),
                message: "catalog is not valid UTF-8".to_string(),
            })?;
            catalogs.push(Catalog::parse(&label, locale, &source)?);
        }
        CatalogSet::new(catalogs)
    }

    /// Collects catalog files below `dir` without following symlinks.
    fn discover(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), GenError> {
        let entries = fs::read_dir(dir).map_err(|err| self.io_error(dir, &err))?;
        let mut entries = entries
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| self.io_error(dir, &err))?;
        entries.sort_by_key(fs::DirEntry::file_name);
        for entry in entries {
            let path = entry.path();
            let file_type = entry.file_type().map_err(|err| self.io_error(&path, &err))?;
            if file_type.is_dir() {
                self.discover(&path, files)?;
            } else if file_type.is_file() && self.locale_of(&path).is_some() {
                if files.len() >= self.options.max_files {
                    return Err(GenError::InputTooLarge {
                        path: self.label(dir),
                        detail: format!("more than {} catalog files", self.options.max_files),
                    });
                }
                files.push(path);
            }
        }
        Ok(())
    }

    /// Returns the locale part of a catalog file name, if it has the suffix.
    fn locale_of(&self, path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let tag = name.strip_suffix(self.options.suffix.as_str())?.strip_suffix('.')?;
        Some(tag.to_string())
    }

    /// Reads at most `max_file_bytes` from `path`.
    fn read_bounded(&self, path: &Path, label: &str) -> Result<Vec<u8>, GenError> {
        let limit = self.options.max_file_bytes;
        let too_large = |size: u64| GenError::InputTooLarge {
            path: label.to_string(),
            detail: format!("{size} bytes exceeds limit of {limit} bytes"),
        };
        let file = File::open(path).map_err(|err| self.io_error(path, &err))?;
        let size = file.metadata().map_err(|err| self.io_error(path, &err))?.len();
        if size > limit {
            return Err(too_large(size));
        }
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| self.io_error(path, &err))?;
        let actual = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if actual > limit {
            return Err(too_large(actual));
        }
        Ok(bytes)
    }

    /// Formats `path` relative to the root with `/` separators.
    fn label(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Wraps an IO error with the path label.
    fn io_error(&self, path: &Path, err: &std::io::Error) -> GenError {
        GenError::Io {
            path: self.label(path),
            message: err.to_string(),
        }
    }
}
