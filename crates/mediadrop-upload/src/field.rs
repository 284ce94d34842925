//! Text field with an explicit commit step.
//!
//! Edits go to a draft buffer; the owner only sees the value once it is applied.
//! Used for the URL input of an upload field and for free-text editors that must
//! not propagate half-typed input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Must be at most {max} characters ({actual} entered)")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Default)]
pub struct CommitField {
    draft: String,
    committed: String,
    max_length: Option<usize>,
    required: bool,
    error: Option<FieldError>,
}

impl CommitField {
    pub fn new(initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            draft: initial.clone(),
            committed: initial,
            ..Self::default()
        }
    }

    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Characters left before the limit, if there is one.
    pub fn remaining(&self) -> Option<usize> {
        self.max_length
            .map(|max| max.saturating_sub(self.draft.chars().count()))
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Replace the draft. Clears a previous apply error.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.error = None;
    }

    /// Commit the draft.
    ///
    /// Returns the new committed value when it changed, `None` when the draft
    /// matched what was already committed.
    pub fn apply(&mut self) -> Result<Option<String>, FieldError> {
        let value = self.draft.trim().to_string();

        if self.required && value.is_empty() {
            self.error = Some(FieldError::Required);
            return Err(FieldError::Required);
        }

        if let Some(max) = self.max_length {
            let actual = value.chars().count();
            if actual > max {
                let err = FieldError::TooLong { max, actual };
                self.error = Some(err.clone());
                return Err(err);
            }
        }

        self.error = None;
        self.draft = value.clone();
        if value == self.committed {
            return Ok(None);
        }
        self.committed = value.clone();
        Ok(Some(value))
    }

    /// Drop the draft and go back to the committed value.
    pub fn revert(&mut self) {
        self.draft = self.committed.clone();
        self.error = None;
    }
}
