//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (editing a field, pressing submit)
/// - Results of asynchronous steps (server accepted or rejected the draft)
pub trait Intent: Send + 'static {}
