//! Error types for property access and initializer instantiation.

use thiserror::Error;

/// Result type for property operations.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors raised while reading, copying or merging properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// A field declared by the target initializer is required but the source
    /// container has no property of that name.
    #[error(
        "Combining incompatible initializers: '{source_name}' has no property '{missing}' required by '{target}'"
    )]
    IncompatibleInitializer {
        source_name: String,
        target: String,
        missing: String,
    },

    /// Two slots with the same name hold different value types.
    #[error("Type mismatch for property '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// Lookup of a property that the container does not declare.
    #[error("Property '{name}' not found in container '{container}'")]
    MissingProperty { name: String, container: String },

    /// A value could not be converted to or from its serialized form.
    #[error("Cannot convert value of property '{name}': {message}")]
    Serialization { name: String, message: String },

    /// The plugin refused an initializer during its typed entry point.
    #[error("Initializer rejected: {what}")]
    Rejected { what: String },
}

impl PropertyError {
    pub(crate) fn missing(name: &str, container: &str) -> Self {
        PropertyError::MissingProperty {
            name: name.to_string(),
            container: container.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incompatible_display_names_everything() {
        let err = PropertyError::IncompatibleInitializer {
            source_name: "Initializer".into(),
            target: "Config".into(),
            missing: "a".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("incompatible"));
        assert!(msg.contains("'a'"));
        assert!(msg.contains("Config"));
    }
}
