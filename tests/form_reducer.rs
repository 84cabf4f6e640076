mod common;

use common::{png_file, valid_draft};
use profile_intake::form::{
    Field, FieldError, FieldValue, FormIntent, FormPhase, FormReducer, FormState, ImageFile,
    ProfileDraft, FIX_ERRORS_MESSAGE, SUBMITTED_MESSAGE,
};
use profile_intake::mvi::Reducer;
use profile_intake::notify::Notification;

fn change(state: FormState, field: Field, value: impl Into<FieldValue>) -> FormState {
    FormReducer::reduce(
        state,
        FormIntent::FieldChanged {
            field,
            value: value.into(),
        },
    )
}

fn editing(draft: ProfileDraft) -> FormState {
    FormState {
        draft,
        ..FormState::default()
    }
}

fn submitting() -> FormState {
    FormReducer::reduce(editing(valid_draft()), FormIntent::SubmitRequested)
}

#[test]
fn initial_state_is_empty_and_editable() {
    let state = FormState::default();
    assert_eq!(state.phase, FormPhase::Editing);
    assert!(state.is_editable());
    assert!(!state.is_loading());
    assert!(!state.errors.has_errors());
    assert!(state.notification.is_none());
}

#[test]
fn field_change_updates_value_and_revalidates_that_field() {
    let state = change(FormState::default(), Field::Email, "bob@example.com");
    assert_eq!(state.draft.email, "bob@example.com");
    assert_eq!(state.errors.get(Field::Email), Some(FieldError::DomainNotAllowed));
    assert_eq!(state.errors.get(Field::Name), None);

    let state = change(state, Field::Email, "bob@gmail.com");
    assert_eq!(state.errors.get(Field::Email), None);
}

#[test]
fn field_change_keeps_other_errors() {
    let state = change(FormState::default(), Field::Age, "7");
    let state = change(state, Field::Name, "Bob");
    assert_eq!(state.errors.get(Field::Age), Some(FieldError::BadFormat));
    assert_eq!(state.errors.get(Field::Name), None);
}

#[test]
fn name_over_fifty_chars_is_flagged() {
    let state = change(FormState::default(), Field::Name, "x".repeat(51));
    assert_eq!(state.errors.get(Field::Name), Some(FieldError::TooLong));
    assert_eq!(
        FieldError::TooLong.to_string(),
        "Name should be maximum 50 characters long"
    );
}

#[test]
fn role_and_company_have_no_keystroke_rule() {
    let state = change(FormState::default(), Field::Role, "");
    let state = change(state, Field::Company, "");
    assert!(!state.errors.has_errors());
}

#[test]
fn non_image_file_is_flagged() {
    let pdf = ImageFile::new("cv.pdf", "application/pdf", vec![1, 2, 3]);
    let state = change(FormState::default(), Field::Image, pdf);
    assert_eq!(state.errors.get(Field::Image), Some(FieldError::NotAnImage));

    let state = change(state, Field::Image, png_file());
    assert_eq!(state.errors.get(Field::Image), None);
}

#[test]
fn mismatched_value_kind_is_ignored() {
    let state = change(FormState::default(), Field::Image, "not a file");
    assert!(state.draft.image.is_none());
    assert_eq!(state, FormState::default());
}

#[test]
fn submit_with_empty_form_flags_every_field() {
    let state = FormReducer::reduce(FormState::default(), FormIntent::SubmitRequested);
    assert_eq!(state.phase, FormPhase::Editing);
    for field in Field::ALL {
        assert_eq!(state.errors.get(field), Some(FieldError::Required(field)));
    }
    assert_eq!(state.notification, Some(Notification::error(FIX_ERRORS_MESSAGE)));
}

#[test]
fn whitespace_only_counts_as_missing() {
    let mut draft = valid_draft();
    draft.company = "   ".to_string();
    let state = FormReducer::reduce(editing(draft), FormIntent::SubmitRequested);
    assert_eq!(
        state.errors.get(Field::Company),
        Some(FieldError::Required(Field::Company))
    );
    assert_eq!(state.phase, FormPhase::Editing);
}

#[test]
fn submit_revalidates_everything() {
    // Age was never touched through FieldChanged, so no error was recorded yet
    let mut draft = valid_draft();
    draft.age = "5".to_string();
    let state = FormReducer::reduce(editing(draft), FormIntent::SubmitRequested);
    assert_eq!(state.errors.get(Field::Age), Some(FieldError::BadFormat));
    assert_eq!(state.errors.iter().count(), 1);
}

#[test]
fn valid_submit_enters_submitting() {
    let state = submitting();
    assert_eq!(state.phase, FormPhase::Submitting);
    assert!(state.is_loading());
    assert!(!state.errors.has_errors());
    assert!(state.notification.is_none());
}

#[test]
fn submitting_ignores_edits_and_repeat_submits() {
    let state = submitting();
    let after_edit = change(state.clone(), Field::Name, "Eve");
    assert_eq!(after_edit, state);

    let after_submit = FormReducer::reduce(state.clone(), FormIntent::SubmitRequested);
    assert_eq!(after_submit, state);
}

#[test]
fn success_clears_draft_and_locks_form() {
    let state = FormReducer::reduce(submitting(), FormIntent::SubmitSucceeded);
    assert_eq!(state.phase, FormPhase::Submitted);
    assert!(state.is_read_only());
    assert_eq!(state.draft, ProfileDraft::default());
    assert_eq!(state.notification, Some(Notification::success(SUBMITTED_MESSAGE)));

    let after_edit = change(state.clone(), Field::Email, "x@gmail.com");
    assert_eq!(after_edit, state);
}

#[test]
fn failure_returns_to_editing_and_keeps_draft() {
    let state = FormReducer::reduce(
        submitting(),
        FormIntent::SubmitFailed {
            message: "User already exists".to_string(),
        },
    );
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.draft, valid_draft());
    assert_eq!(
        state.notification,
        Some(Notification::error("User already exists"))
    );
}

#[test]
fn outcome_outside_submitting_is_ignored() {
    let state = editing(valid_draft());
    let after = FormReducer::reduce(state.clone(), FormIntent::SubmitSucceeded);
    assert_eq!(after, state);

    let after = FormReducer::reduce(
        state.clone(),
        FormIntent::SubmitFailed {
            message: "late".to_string(),
        },
    );
    assert_eq!(after, state);
}
