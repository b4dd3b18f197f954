//! Declared handler parameters.
//!
//! A [`Signature`] is the explicit description of a handler's parameters:
//! names, declared types, optional bindings and defaults. The pipeline
//! resolves each parameter from the request using this description alone.

use crate::schema::SchemaType;
use crate::settings::ParamSettings;
use crate::value::Value;

/// A declared enumeration: a named set of allowed string values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    name: String,
    choices: Vec<String>,
}

impl EnumSpec {
    /// Creates an enumeration.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// The enumeration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The allowed values.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

/// The declared type of a parameter.
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// No annotation.
    Unannotated,
    /// Any value, unvalidated.
    Any,
    /// A boolean.
    Bool,
    /// A string.
    Str,
    /// An integer.
    Int,
    /// A floating-point number.
    Float,
    /// A fixed-point decimal.
    Decimal,
    /// A timezone-aware datetime.
    DateTime,
    /// A calendar date.
    Date,
    /// A time of day.
    Time,
    /// A duration.
    Duration,
    /// One of a declared set of values.
    Enum(EnumSpec),
    /// A list of items of the inner type.
    List(Box<TypeSpec>),
    /// A complex-schema type.
    Schema(SchemaType),
    /// The request object itself.
    Request,
    /// The authenticated principal.
    Principal,
    /// Any other declared type. Only presence and defaults are checked.
    Other(String),
}

impl TypeSpec {
    /// A list of `inner`.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    /// An enumeration type.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(EnumSpec::new(name, choices))
    }

    /// The item type, if this is a list.
    #[must_use]
    pub fn list_item(&self) -> Option<&Self> {
        match self {
            Self::List(inner) => Some(inner),
            _ => None,
        }
    }

    /// The schema, if this is a complex-schema type.
    #[must_use]
    pub const fn schema(&self) -> Option<&SchemaType> {
        match self {
            Self::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    /// A readable name for logs.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Unannotated => "unannotated".to_string(),
            Self::Any => "any".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Str => "str".to_string(),
            Self::Int => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::Decimal => "decimal".to_string(),
            Self::DateTime => "datetime".to_string(),
            Self::Date => "date".to_string(),
            Self::Time => "time".to_string(),
            Self::Duration => "duration".to_string(),
            Self::Enum(spec) => spec.name().to_string(),
            Self::List(inner) => format!("list[{}]", inner.name()),
            Self::Schema(schema) => schema.name().to_string(),
            Self::Request => "request".to_string(),
            Self::Principal => "principal".to_string(),
            Self::Other(name) => name.clone(),
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamKind {
    /// An ordinary positional parameter.
    #[default]
    Positional,
    /// The receiver of a method-style handler.
    Receiver,
    /// A variadic positional parameter.
    VarPositional,
    /// A variadic keyword parameter.
    VarKeyword,
}

/// One declared handler parameter.
///
/// The explicit binding and the default are separate slots.
///
/// # Example
///
/// ```
/// use typed_views_core::{Parameter, ParamSettings, TypeSpec, Value};
///
/// let id = Parameter::new("id", TypeSpec::Int)
///     .bind(ParamSettings::path().build().unwrap());
/// let page = Parameter::new("page", TypeSpec::Int).with_default(Value::Int(1));
///
/// assert!(id.binding().is_some());
/// assert_eq!(page.default_value(), Some(&Value::Int(1)));
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    ty: TypeSpec,
    binding: Option<ParamSettings>,
    default: Option<Value>,
    kind: ParamKind,
}

impl Parameter {
    /// A positional parameter with a declared type.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            binding: None,
            default: None,
            kind: ParamKind::Positional,
        }
    }

    /// An unannotated positional parameter.
    #[must_use]
    pub fn unannotated(name: impl Into<String>) -> Self {
        Self::new(name, TypeSpec::Unannotated)
    }

    /// The `self` receiver of a method-style handler.
    #[must_use]
    pub fn receiver() -> Self {
        Self::unannotated("self").with_kind(ParamKind::Receiver)
    }

    /// Attaches an explicit binding.
    #[must_use]
    pub fn bind(mut self, settings: ParamSettings) -> Self {
        self.binding = Some(settings);
        self
    }

    /// Sets the parameter's own default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets how the parameter is passed.
    #[must_use]
    pub const fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type.
    #[must_use]
    pub const fn ty(&self) -> &TypeSpec {
        &self.ty
    }

    /// The explicit binding, if any.
    #[must_use]
    pub const fn binding(&self) -> Option<&ParamSettings> {
        self.binding.as_ref()
    }

    /// The parameter's own default, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// How the parameter is passed.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        self.kind
    }

    /// The default that applies when the value is absent: the binding's
    /// default, falling back to the parameter's own.
    #[must_use]
    pub fn effective_default(&self) -> Option<&Value> {
        self.binding
            .as_ref()
            .and_then(ParamSettings::default_value)
            .or(self.default.as_ref())
    }

    /// Returns `true` if the parameter is variadic.
    #[must_use]
    pub const fn is_variadic(&self) -> bool {
        matches!(self.kind, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// A handler's declared parameters.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    params: Vec<Parameter>,
}

impl Signature {
    /// Creates an empty signature for a named handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    /// The handler name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The parameters that are resolved from the request (receivers excluded).
    pub fn bound_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.kind() != ParamKind::Receiver)
    }
}
