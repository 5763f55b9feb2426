/// What the caller expects the model to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// A single JSON value. Backends with a native JSON mode are asked to use it.
    Json,
    /// Free-form prose.
    Text,
}

/// One fully rendered model request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Persona sent as the system message on backends that support one.
    pub system: &'static str,
    pub text: String,
    pub format: ResponseFormat,
}

impl Prompt {
    #[must_use]
    pub fn json(system: &'static str, text: String) -> Self {
        Self {
            system,
            text,
            format: ResponseFormat::Json,
        }
    }

    #[must_use]
    pub fn text(system: &'static str, text: String) -> Self {
        Self {
            system,
            text,
            format: ResponseFormat::Text,
        }
    }
}
