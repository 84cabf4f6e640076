//! Model-View-Intent (MVI) primitives.
//!
//! Screens in this crate are headless: each one is a state value that only
//! changes by feeding intents through its reducer.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: plain value holding everything a view needs to render
//! - **Intent**: user action or completion of an async step
//! - **Reducer**: pure function turning (state, intent) into the next state

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
