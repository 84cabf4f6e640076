use crate::form::draft::ProfileDraft;
use crate::form::validation::FieldErrors;
use crate::mvi::UiState;
use crate::notify::Notification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    /// A submit attempt is in flight; drives the loading indicator.
    Submitting,
    /// Terminal for this form instance. Fields are read-only.
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    pub draft: ProfileDraft,
    pub errors: FieldErrors,
    pub phase: FormPhase,
    /// Last toast-style message, replaced by every transition that emits one.
    pub notification: Option<Notification>,
}

impl UiState for FormState {}

impl FormState {
    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn is_read_only(&self) -> bool {
        self.phase == FormPhase::Submitted
    }

    pub fn is_editable(&self) -> bool {
        self.phase == FormPhase::Editing
    }
}
