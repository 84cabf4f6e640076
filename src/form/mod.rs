//! The intake form: draft, validation rules and state machine.

mod controller;
mod draft;
mod intent;
mod reducer;
mod state;
pub mod validation;

pub use controller::FormController;
pub use draft::{Field, FieldValue, ImageFile, ProfileDraft};
pub use intent::FormIntent;
pub use reducer::{FormReducer, FIX_ERRORS_MESSAGE, SUBMITTED_MESSAGE};
pub use state::{FormPhase, FormState};
pub use validation::{FieldError, FieldErrors};
