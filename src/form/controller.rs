use crate::form::draft::{Field, FieldValue};
use crate::form::intent::FormIntent;
use crate::form::reducer::FormReducer;
use crate::form::state::{FormPhase, FormState};
use crate::mvi::Reducer;
use crate::route::{Redirect, Route, REDIRECT_DELAY};
use crate::store::RecordStore;
use crate::submission::{SubmissionPipeline, SubmitError};

/// Drives one form instance.
///
/// Intents go through [`FormReducer`]; when a submit moves the form to
/// `Submitting`, the controller runs the pipeline, persists the record and
/// feeds the outcome back as a terminal intent.
pub struct FormController {
    state: FormState,
    pipeline: SubmissionPipeline,
    records: RecordStore,
}

impl FormController {
    pub fn new(pipeline: SubmissionPipeline, records: RecordStore) -> Self {
        Self {
            state: FormState::default(),
            pipeline,
            records,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Shorthand for a `FieldChanged` intent.
    pub fn change(&mut self, field: Field, value: impl Into<FieldValue>) {
        self.apply(FormIntent::FieldChanged {
            field,
            value: value.into(),
        });
    }

    /// Process one intent. Returns the navigation to perform after a
    /// successful submit.
    pub async fn dispatch(&mut self, intent: FormIntent) -> Option<Redirect> {
        let is_submit = matches!(intent, FormIntent::SubmitRequested);
        self.apply(intent);

        if !is_submit || self.state.phase != FormPhase::Submitting {
            return None;
        }

        match self.run_submission().await {
            Ok(()) => {
                tracing::info!("profile submitted");
                self.apply(FormIntent::SubmitSucceeded);
                Some(Redirect::delayed(Route::Report, REDIRECT_DELAY))
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.apply(FormIntent::SubmitFailed {
                    message: err.user_message(),
                });
                None
            }
        }
    }

    async fn run_submission(&self) -> Result<(), SubmitError> {
        let record = self.pipeline.submit(&self.state.draft).await?;
        self.records.save(&record)?;
        Ok(())
    }

    fn apply(&mut self, intent: FormIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = FormReducer::reduce(state, intent);
        tracing::debug!(phase = ?self.state.phase, "form state updated");
    }
}
