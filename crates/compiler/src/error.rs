use super::SourceLocation;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum CompilationErrorKind {
    // malformed input
    MalformedAttributeValue,
    MalformedDirectiveValue,
    InvalidEventModifier,
    DuplicateSlotName,
    InvalidExpression,

    // directive misuse
    VBindNoExpression,
    VOnNoExpression,
    VModelNoExpression,
    VModelMalformedExpression,
    VModelOnInvalidElement,
    VModelOnFileInput,

    // unsupported constructs
    NotImplemented,
    SsrNotSupported,

    // Special value for higher-order compilers to pick up the last code
    // to avoid collision of error codes. This should always be kept as the last item.
    ExtendPoint,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CompilationError {
    pub kind: CompilationErrorKind,
    pub additional_message: Option<String>,
    pub location: SourceLocation,
}

pub type CompileResult<T> = Result<T, CompilationError>;

impl CompilationError {
    pub fn new(kind: CompilationErrorKind) -> Self {
        Self {
            kind,
            additional_message: None,
            location: Default::default(),
        }
    }
    pub fn with_location(mut self, loc: SourceLocation) -> Self {
        self.location = loc;
        self
    }
    pub fn with_additional_message<S: Into<String>>(mut self, msg: S) -> Self {
        self.additional_message = Some(msg.into());
        self
    }

    /// Shorthand for the unsupported-construct gap.
    pub fn not_implemented(construct: &str, loc: &SourceLocation) -> Self {
        Self::new(CompilationErrorKind::NotImplemented)
            .with_additional_message(construct)
            .with_location(loc.clone())
    }

    fn msg(&self) -> &'static str {
        msg(&self.kind)
    }
}

#[cold]
#[inline(never)]
fn msg(kind: &CompilationErrorKind) -> &'static str {
    use CompilationErrorKind::*;
    match *kind {
        MalformedAttributeValue => "Attribute value has an unexpected shape: ",
        MalformedDirectiveValue => "Directive value must be a single expression: ",
        InvalidEventModifier => "Unknown event modifier: ",
        DuplicateSlotName => "Duplicate slot names found: ",
        InvalidExpression => "Error parsing JavaScript expression: ",

        VBindNoExpression => "Binding is missing expression.",
        VOnNoExpression => "Event handler is missing expression.",
        VModelNoExpression => "Two-way binding is missing expression.",
        VModelMalformedExpression =>
            "Two-way binding value must be a valid JavaScript member expression.",
        VModelOnInvalidElement =>
            "Two-way binding can only be used on <input>, <textarea>, <select> and components.",
        VModelOnFileInput =>
            "Two-way binding cannot be used on file inputs since they are read-only.",

        NotImplemented => "Not implemented: ",
        SsrNotSupported => "Server rendering is not supported by this compiler.",
        ExtendPoint => "",
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(additional) = &self.additional_message {
            write!(f, "{}{}", self.msg(), additional)
        } else {
            write!(f, "{}", self.msg())
        }
    }
}

impl std::error::Error for CompilationError {}
