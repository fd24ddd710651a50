//! Errors produced while decoding a model.

use thiserror::Error;

use crate::shape::ShapeType;

/// Which part of an absolute shape identifier failed the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdComponent {
    /// The dot-separated namespace and the `#` that ends it.
    Namespace,
    /// The shape name after `#`.
    ShapeName,
    /// The member name after `$`.
    MemberName,
}

impl std::fmt::Display for IdComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IdComponent::Namespace => "namespace followed by '#'",
            IdComponent::ShapeName => "shape name",
            IdComponent::MemberName => "member name",
        })
    }
}

#[derive(Debug, Error)]
pub enum AstError {
    /// The input is not a well-formed JSON token stream.
    #[error("malformed JSON at offset {offset}: {reason}")]
    MalformedJson { offset: usize, reason: &'static str },
    #[error("expected {expected} at offset {offset}")]
    Syntax { offset: usize, expected: String },
    #[error("duplicate key {key:?} at offset {offset}")]
    DuplicateKey { key: String, offset: usize },
    #[error("expected {expected} at offset {offset}")]
    TypeMismatch { offset: usize, expected: &'static str },
    #[error("value at offset {offset} is not {expected}")]
    InvalidValue { offset: usize, expected: &'static str },
    #[error("invalid shape ID {value:?} at offset {offset}: bad {component}")]
    Grammar {
        value: String,
        offset: usize,
        component: IdComponent,
    },
    #[error("unsupported key {key:?} in {entity} at offset {offset}")]
    UnsupportedKey {
        entity: &'static str,
        key: String,
        offset: usize,
    },
    #[error("unrecognized shape type {value:?} at offset {offset}")]
    UnrecognizedType { value: String, offset: usize },
    #[error("shape at offset {offset} is missing its type")]
    MissingType { offset: usize },
    #[error("model at offset {offset} is missing its version")]
    MissingVersion { offset: usize },
    #[error("shape of type {shape_type} cannot contain field {field:?} (offset {offset})")]
    FieldNotAllowedForType {
        field: &'static str,
        shape_type: ShapeType,
        offset: usize,
    },
    #[error("model does not contain member target shape {id}")]
    DanglingReference { id: String },
    #[error("member has no target")]
    MissingTarget,
    #[error("nesting deeper than {limit} at offset {offset}")]
    DepthLimit { offset: usize, limit: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AstError {
    /// Byte offset of the violation, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            AstError::MalformedJson { offset, .. }
            | AstError::Syntax { offset, .. }
            | AstError::DuplicateKey { offset, .. }
            | AstError::TypeMismatch { offset, .. }
            | AstError::InvalidValue { offset, .. }
            | AstError::Grammar { offset, .. }
            | AstError::UnsupportedKey { offset, .. }
            | AstError::UnrecognizedType { offset, .. }
            | AstError::MissingType { offset }
            | AstError::MissingVersion { offset }
            | AstError::FieldNotAllowedForType { offset, .. }
            | AstError::DepthLimit { offset, .. } => Some(*offset),
            AstError::DanglingReference { .. } | AstError::MissingTarget | AstError::Io(_) => None,
        }
    }

    /// True when the input was not JSON at all, as opposed to valid JSON
    /// that is not a valid model.
    pub fn is_malformed_json(&self) -> bool {
        matches!(self, AstError::MalformedJson { .. })
    }
}

pub type Result<T> = std::result::Result<T, AstError>;
