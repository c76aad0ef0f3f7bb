//! Annotation Errors
//!
//! Every failure raised while collecting a class aborts that class. The class
//! name travels with the error so a build step can report the offending unit.

use crate::filter::FilterSyntaxError;
use thiserror::Error;

/// Placeholder used when an error is raised before the class has been named.
pub const UNNAMED_CLASS: &str = "<unnamed>";

pub type Result<T> = std::result::Result<T, AnnotationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// The annotations on a class contradict each other, or an annotation sits
    /// on a member with the wrong shape.
    #[error("invalid annotations in class {class}: {message}")]
    Structural { class: String, message: String },

    /// A service filter could not be parsed.
    #[error("invalid filter {filter:?} in class {class}: {source}")]
    Syntax {
        class: String,
        filter: String,
        #[source]
        source: FilterSyntaxError,
    },

    /// An attribute value is missing, out of bounds or of the wrong type.
    #[error("invalid attribute in class {class}: {message}")]
    Attribute { class: String, message: String },

    /// The event source broke the event protocol.
    #[error("event protocol violation in class {class}: {message}")]
    Protocol { class: String, message: String },
}

impl AnnotationError {
    pub fn structural(class: impl Into<String>, message: impl Into<String>) -> Self {
        AnnotationError::Structural {
            class: class.into(),
            message: message.into(),
        }
    }

    pub fn attribute(class: impl Into<String>, message: impl Into<String>) -> Self {
        AnnotationError::Attribute {
            class: class.into(),
            message: message.into(),
        }
    }

    pub fn protocol(class: impl Into<String>, message: impl Into<String>) -> Self {
        AnnotationError::Protocol {
            class: class.into(),
            message: message.into(),
        }
    }

    pub fn syntax(
        class: impl Into<String>,
        filter: impl Into<String>,
        source: FilterSyntaxError,
    ) -> Self {
        AnnotationError::Syntax {
            class: class.into(),
            filter: filter.into(),
            source,
        }
    }

    /// Name of the class being compiled when the error was raised.
    pub fn class_name(&self) -> &str {
        match self {
            AnnotationError::Structural { class, .. }
            | AnnotationError::Syntax { class, .. }
            | AnnotationError::Attribute { class, .. }
            | AnnotationError::Protocol { class, .. } => class,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, AnnotationError::Structural { .. })
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, AnnotationError::Syntax { .. })
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, AnnotationError::Attribute { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, AnnotationError::Protocol { .. })
    }
}
