use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// A malformed program document. Spans are byte offsets into the source.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub notes: Vec<String>,
    /// Where the clashing definition lives, for duplicate ids.
    pub related: Option<(Range<usize>, String)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
            related: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_related(mut self, span: Range<usize>, label: impl Into<String>) -> Self {
        self.related = Some((span, label.into()));
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let primary = Label::primary(self.file_id, self.span.clone());
        let secondary = self
            .related
            .iter()
            .map(|(span, label)| Label::secondary(self.file_id, span.clone()).with_message(label));
        Diagnostic::error()
            .with_message(&self.message)
            .with_labels(std::iter::once(primary).chain(secondary).collect())
            .with_notes(self.notes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_location_becomes_secondary_label() {
        let error = ParseError::new("duplicate block id 'a'", 40..43, 0)
            .with_related(10..13, "first used here")
            .with_note("ids must be unique");
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!(diagnostic.labels[1].range, 10..13);
        assert_eq!(diagnostic.notes, vec!["ids must be unique".to_string()]);
    }
}
