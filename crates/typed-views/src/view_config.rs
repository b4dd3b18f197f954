//! Host view configuration carried by wrapped endpoints.
//!
//! The pipeline never interprets these values. An endpoint keeps whatever its
//! declaration specified so the host can render, parse, authenticate,
//! throttle and authorize exactly as it would for an unwrapped view.
//!
//! # Example
//!
//! ```rust
//! use typed_views::ViewConfig;
//!
//! let config = ViewConfig::builder()
//!     .permission_classes(["IsAuthenticated"])
//!     .throttle_classes(["UserRateThrottle"])
//!     .build();
//!
//! assert_eq!(config.permission_classes(), ["IsAuthenticated"]);
//! assert_eq!(config.renderer_classes(), ["JSONRenderer", "BrowsableAPIRenderer"]);
//! ```

/// Default renderers.
pub const DEFAULT_RENDERER_CLASSES: &[&str] = &["JSONRenderer", "BrowsableAPIRenderer"];

/// Default parsers.
pub const DEFAULT_PARSER_CLASSES: &[&str] = &["JSONParser", "FormParser", "MultiPartParser"];

/// Default authentication schemes.
pub const DEFAULT_AUTHENTICATION_CLASSES: &[&str] =
    &["SessionAuthentication", "BasicAuthentication"];

/// Default permission policies.
pub const DEFAULT_PERMISSION_CLASSES: &[&str] = &["AllowAny"];

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// Renderer, parser, authentication, throttle and permission settings of a
/// view.
///
/// Use [`ViewConfig::builder()`] to override individual lists; anything left
/// unset keeps the host default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    renderer_classes: Vec<String>,
    parser_classes: Vec<String>,
    authentication_classes: Vec<String>,
    throttle_classes: Vec<String>,
    permission_classes: Vec<String>,
}

impl ViewConfig {
    /// Creates a new builder seeded with the host defaults.
    #[must_use]
    pub fn builder() -> ViewConfigBuilder {
        ViewConfigBuilder::default()
    }

    /// Returns the renderers.
    #[must_use]
    pub fn renderer_classes(&self) -> &[String] {
        &self.renderer_classes
    }

    /// Returns the parsers.
    #[must_use]
    pub fn parser_classes(&self) -> &[String] {
        &self.parser_classes
    }

    /// Returns the authentication schemes.
    #[must_use]
    pub fn authentication_classes(&self) -> &[String] {
        &self.authentication_classes
    }

    /// Returns the throttles.
    #[must_use]
    pub fn throttle_classes(&self) -> &[String] {
        &self.throttle_classes
    }

    /// Returns the permission policies.
    #[must_use]
    pub fn permission_classes(&self) -> &[String] {
        &self.permission_classes
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ViewConfig`].
#[derive(Debug, Clone)]
pub struct ViewConfigBuilder {
    config: ViewConfig,
}

impl Default for ViewConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewConfigBuilder {
    /// Creates a new builder with the host defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ViewConfig {
                renderer_classes: owned(DEFAULT_RENDERER_CLASSES),
                parser_classes: owned(DEFAULT_PARSER_CLASSES),
                authentication_classes: owned(DEFAULT_AUTHENTICATION_CLASSES),
                throttle_classes: Vec::new(),
                permission_classes: owned(DEFAULT_PERMISSION_CLASSES),
            },
        }
    }

    /// Sets the renderers.
    pub fn renderer_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.renderer_classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the parsers.
    pub fn parser_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.parser_classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the authentication schemes.
    pub fn authentication_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.authentication_classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the throttles.
    pub fn throttle_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.throttle_classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the permission policies.
    pub fn permission_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.permission_classes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ViewConfig {
        self.config
    }
}
