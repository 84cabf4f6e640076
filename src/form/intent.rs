use crate::form::draft::{Field, FieldValue};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum FormIntent {
    /// User edited one field. Only that field is revalidated.
    FieldChanged { field: Field, value: FieldValue },
    /// User pressed submit. Revalidates the whole draft from scratch.
    SubmitRequested,
    /// Server accepted the draft and the record was persisted.
    SubmitSucceeded,
    /// Submit attempt failed; `message` is shown to the user.
    SubmitFailed { message: String },
}

impl Intent for FormIntent {}
