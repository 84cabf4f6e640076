use crate::form::draft::ProfileDraft;
use crate::form::intent::FormIntent;
use crate::form::state::{FormPhase, FormState};
use crate::form::validation::{validate_draft, validate_field, FieldErrors};
use crate::mvi::Reducer;
use crate::notify::Notification;

pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors in the form";
pub const SUBMITTED_MESSAGE: &str = "Form submitted successfully!";

pub struct FormReducer;

impl Reducer for FormReducer {
    type State = FormState;
    type Intent = FormIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FormIntent::FieldChanged { field, value } => match state.phase {
                FormPhase::Editing => {
                    let mut state = state;
                    if state.draft.apply(field, value) {
                        let error = validate_field(field, &state.draft);
                        state.errors.set(field, error);
                    }
                    state
                }
                // Read-only while loading and after submit
                _ => state,
            },
            FormIntent::SubmitRequested => match state.phase {
                FormPhase::Editing => {
                    let errors = validate_draft(&state.draft);
                    if errors.has_errors() {
                        FormState {
                            errors,
                            notification: Some(Notification::error(FIX_ERRORS_MESSAGE)),
                            ..state
                        }
                    } else {
                        FormState {
                            errors: FieldErrors::default(),
                            phase: FormPhase::Submitting,
                            notification: None,
                            ..state
                        }
                    }
                }
                _ => state,
            },
            FormIntent::SubmitSucceeded => match state.phase {
                FormPhase::Submitting => FormState {
                    draft: ProfileDraft::default(),
                    errors: FieldErrors::default(),
                    phase: FormPhase::Submitted,
                    notification: Some(Notification::success(SUBMITTED_MESSAGE)),
                },
                _ => state,
            },
            FormIntent::SubmitFailed { message } => match state.phase {
                FormPhase::Submitting => FormState {
                    phase: FormPhase::Editing,
                    notification: Some(Notification::error(message)),
                    ..state
                },
                _ => state,
            },
        }
    }
}
