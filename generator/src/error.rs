use std::ops::Range;

use blocks::block::Block;
use blocks::board::PinRole;
use thiserror::Error;

/// Reasons a generation pass can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Two incompatible roles claimed the same physical pin.
    #[error(
        "pin {pin} is already reserved for {existing_purpose} ({existing_role}) and cannot be used for {purpose} ({role})"
    )]
    PinConflict {
        pin: String,
        existing_role: PinRole,
        existing_purpose: String,
        role: PinRole,
        purpose: String,
    },

    /// A role claimed a pin outside the board's eligible set for that role.
    #[error("pin {pin} cannot be used as {role} on board '{board}'")]
    Capability {
        pin: String,
        role: PinRole,
        board: String,
    },

    #[error("no generator registered for block type '{0}'")]
    UnknownBlockType(String),

    #[error("block '{block_type}' is missing field {field}")]
    MissingField { block_type: String, field: String },

    #[error("block '{block_type}' has invalid value '{value}' for field {field}")]
    InvalidField {
        block_type: String,
        field: String,
        value: String,
    },

    /// A value block placed in a statement position, or the reverse.
    #[error("block '{block_type}' cannot be used as {expected}")]
    WrongBlockShape {
        block_type: String,
        expected: &'static str,
    },

    #[error("blocks are nested more than {0} levels deep")]
    NestingTooDeep(usize),
}

/// A generation error enriched with the identity of the offending block.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct DiagnosticError {
    pub error: GenerationError,
    pub block_id: Option<String>,
    pub span: Option<Range<usize>>,
    pub source_id: usize,
    /// Another block involved in the failure, e.g. the earlier pin claimant.
    pub related: Option<Related>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Related {
    pub block_id: String,
    pub span: Range<usize>,
    pub message: String,
}

impl DiagnosticError {
    /// Attach `block` as the culprit unless a more specific block is already recorded.
    pub fn at_block(mut self, block: &Block, source_id: usize) -> Self {
        if self.block_id.is_none() {
            self.block_id = Some(block.id.clone());
            self.span = Some(block.span.clone());
            self.source_id = source_id;
        }
        self
    }

    pub fn with_related(mut self, related: Related) -> Self {
        self.related = Some(related);
        self
    }
}

impl From<GenerationError> for DiagnosticError {
    fn from(error: GenerationError) -> Self {
        DiagnosticError {
            error,
            block_id: None,
            span: None,
            source_id: 0,
            related: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DiagnosticError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn innermost_block_wins() {
        let inner = Block::new("inner", "servo_read").with_span(10..20);
        let outer = Block::new("outer", "servo_write").with_span(0..40);
        let err = DiagnosticError::from(GenerationError::UnknownBlockType("x".into()))
            .at_block(&inner, 3)
            .at_block(&outer, 3);
        assert_eq!(err.block_id.as_deref(), Some("inner"));
        assert_eq!(err.span, Some(10..20));
        assert_eq!(err.source_id, 3);
    }

    #[test]
    fn conflict_message_names_both_purposes() {
        let err = GenerationError::PinConflict {
            pin: "9".into(),
            existing_role: PinRole::DigitalOutput,
            existing_purpose: "Digital Write".into(),
            role: PinRole::Servo,
            purpose: "Servo Write".into(),
        };
        let msg = DiagnosticError::from(err).to_string();
        assert!(msg.contains("pin 9"));
        assert!(msg.contains("Digital Write (digital-output)"));
        assert!(msg.contains("Servo Write (servo)"));
    }
}
