//! Choice fields: enumerations, `choices` restrictions and file-path listings.

use crate::field::{display_text, messages, FieldKind, Validator};
use serde_json::Value as JsonValue;
use tracing::warn;
use typed_views_core::{ErrorDetail, FilePathOptions, Raw, Value};
use walkdir::WalkDir;

/// A field whose value must be one of a fixed list of strings.
#[derive(Debug, Clone)]
pub struct ChoiceKind {
    choices: Vec<String>,
    allow_blank: bool,
}

impl ChoiceKind {
    /// Creates a choice kind.
    #[must_use]
    pub const fn new(choices: Vec<String>, allow_blank: bool) -> Self {
        Self {
            choices,
            allow_blank,
        }
    }

    /// The allowed values.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

impl FieldKind for ChoiceKind {
    fn to_internal_value(&self, data: &JsonValue) -> Result<Value, ErrorDetail> {
        if self.allow_blank && data.as_str() == Some("") {
            return Ok(Value::Str(String::new()));
        }
        let text = display_text(data);
        if self.choices.contains(&text) {
            Ok(Value::Str(text))
        } else {
            Err(ErrorDetail::message(messages::invalid_choice(&text)))
        }
    }
}

/// Restricts another validator's output to a list of choices.
#[derive(Debug)]
pub struct Restricted {
    inner: Box<dyn Validator>,
    choices: Vec<String>,
}

impl Restricted {
    /// Wraps a validator.
    #[must_use]
    pub fn new(inner: Box<dyn Validator>, choices: Vec<String>) -> Self {
        Self { inner, choices }
    }
}

impl Validator for Restricted {
    fn run_validation(&self, data: Raw) -> Result<Value, ErrorDetail> {
        let supplied = !data.is_empty();
        let value = self.inner.run_validation(data)?;
        let text = value.to_text();
        if supplied && !self.choices.contains(&text) {
            return Err(ErrorDetail::message(messages::invalid_choice(&text)));
        }
        Ok(value)
    }
}

/// Lists the paths that are valid choices for a `file_path` parameter.
///
/// Entries are returned as full paths, sorted. An unreadable or missing
/// directory yields no choices.
#[must_use]
pub fn file_path_choices(options: &FilePathOptions) -> Vec<String> {
    let Some(root) = options.path() else {
        return Vec::new();
    };

    let walker = WalkDir::new(root).min_depth(1).sort_by_file_name();
    let walker = if options.recursive() {
        walker
    } else {
        walker.max_depth(1)
    };

    let mut choices = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %root.display(), error = %e, "Skipping unreadable path entry");
                continue;
            }
        };
        let file_type = entry.file_type();
        let wanted = (file_type.is_file() && options.allow_files())
            || (file_type.is_dir() && options.allow_folders());
        if !wanted {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if options.pattern().is_some_and(|re| !re.is_match(&name)) {
            continue;
        }
        choices.push(entry.path().to_string_lossy().into_owned());
    }
    choices
}
