//! Chooses the validator for a declared type and its settings.

use crate::boolean::BooleanKind;
use crate::choice::{file_path_choices, ChoiceKind, Restricted};
use crate::decimal::DecimalKind;
use crate::fallback::DefaultValidator;
use crate::field::{Field, Validator};
use crate::list::ListKind;
use crate::numeric::{FloatKind, IntegerKind};
use crate::schema::{SchemaKind, SchemaRegistry};
use crate::string::{CharKind, IpKind, StringCheck, UuidKind};
use crate::temporal::{DateKind, DateTimeKind, DurationKind, TimeKind};
use std::sync::Arc;
use tracing::trace;
use typed_views_core::{Format, ParamSettings, Protocol, TypeSpec};

/// Builds validators.
///
/// Precedence, first match wins:
///
/// 1. `bool`
/// 2. `str`: `regex`, then `format`, then `choices`, then a plain string
/// 3. `int`, `float`, `decimal`
/// 4. `datetime`, `date`, `time`, `duration`
/// 5. enumerations
/// 6. lists, with a child validator for the item type
/// 7. schema types from an enabled family
/// 8. anything else: presence and default only
///
/// `choices` on any other scalar restricts the validated value's text form.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use typed_views_core::{ParamSettings, Raw, TypeSpec, Value};
/// use typed_views_validate::{SchemaRegistry, Validator, ValidatorFactory};
///
/// let factory = ValidatorFactory::new(Arc::new(SchemaRegistry::new()));
/// let validator = factory.make(&TypeSpec::Int, &ParamSettings::default());
/// assert_eq!(validator.run_validation(Raw::from("42")), Ok(Value::Int(42)));
/// ```
#[derive(Debug, Clone)]
pub struct ValidatorFactory {
    registry: Arc<SchemaRegistry>,
}

impl ValidatorFactory {
    /// Creates a factory that recognises the registry's schema families.
    #[must_use]
    pub const fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    /// The schema registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Builds the validator for `ty` configured by `settings`.
    #[must_use]
    pub fn make(&self, ty: &TypeSpec, settings: &ParamSettings) -> Box<dyn Validator> {
        trace!(ty = %ty.name(), "building validator");
        let default = settings.default_value().cloned();

        let validator: Box<dyn Validator> = match ty {
            TypeSpec::Bool => Box::new(Field::new(BooleanKind, default)),
            TypeSpec::Str => return Self::string(settings),
            TypeSpec::Int => Box::new(Field::new(IntegerKind::new(settings), default)),
            TypeSpec::Float => Box::new(Field::new(FloatKind::new(settings), default)),
            TypeSpec::Decimal => Box::new(Field::new(DecimalKind::new(settings), default)),
            TypeSpec::DateTime => Box::new(Field::new(DateTimeKind::new(settings), default)),
            TypeSpec::Date => Box::new(Field::new(DateKind::new(settings), default)),
            TypeSpec::Time => Box::new(Field::new(TimeKind::new(settings), default)),
            TypeSpec::Duration => Box::new(Field::new(DurationKind, default)),
            TypeSpec::Enum(spec) => {
                let kind = ChoiceKind::new(spec.choices().to_vec(), settings.allow_blank());
                return Box::new(Field::new(kind, default));
            }
            TypeSpec::List(item) => return self.list(item, settings),
            TypeSpec::Schema(schema) if self.registry.is_enabled(schema.family()) => {
                return Box::new(Field::new(SchemaKind::new(schema.clone()), default));
            }
            _ => Box::new(DefaultValidator::new(default)),
        };

        match settings.choices() {
            Some(choices) => Box::new(Restricted::new(validator, choices.to_vec())),
            None => validator,
        }
    }

    fn string(settings: &ParamSettings) -> Box<dyn Validator> {
        let default = settings.default_value().cloned();

        if let Some(pattern) = settings.regex() {
            let check = StringCheck::Pattern(pattern.clone());
            return Box::new(Field::new(CharKind::new(settings, Some(check)), default));
        }

        if let Some(format) = settings.format() {
            return match format {
                Format::Email => Box::new(Field::new(
                    CharKind::new(settings, Some(StringCheck::Email)),
                    default,
                )),
                Format::Slug => Box::new(Field::new(
                    CharKind::new(settings, Some(StringCheck::Slug)),
                    default,
                )),
                Format::Url => Box::new(Field::new(
                    CharKind::new(settings, Some(StringCheck::Url)),
                    default,
                )),
                Format::Uuid => Box::new(Field::new(UuidKind, default)),
                Format::FilePath => {
                    let choices = file_path_choices(settings.file_path());
                    let kind = ChoiceKind::new(choices, settings.allow_blank());
                    Box::new(Field::new(kind, default))
                }
                Format::Ipv4 => Box::new(Field::new(IpKind::new(settings, Protocol::IPv4), default)),
                Format::Ipv6 => Box::new(Field::new(IpKind::new(settings, Protocol::IPv6), default)),
                Format::Ip => Box::new(Field::new(
                    IpKind::new(settings, settings.protocol()),
                    default,
                )),
            };
        }

        if let Some(choices) = settings.choices() {
            let kind = ChoiceKind::new(choices.to_vec(), settings.allow_blank());
            return Box::new(Field::new(kind, default));
        }

        Box::new(Field::new(CharKind::new(settings, None), default))
    }

    fn list(&self, item: &TypeSpec, settings: &ParamSettings) -> Box<dyn Validator> {
        let child = match item {
            TypeSpec::Any | TypeSpec::Unannotated => None,
            item => {
                let child_settings = settings
                    .child()
                    .cloned()
                    .unwrap_or_default()
                    .with_default(None);
                Some(self.make(item, &child_settings))
            }
        };
        let kind = ListKind::new(settings, child);
        Box::new(Field::new(kind, settings.default_value().cloned()))
    }
}
