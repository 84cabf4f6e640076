//! Profile intake: validate a profile form, upload it with a compressed
//! image, and work with the stored result afterwards.

pub mod api;
pub mod config;
pub mod form;
pub mod listing;
pub mod logging;
pub mod mvi;
pub mod notify;
pub mod preprocess;
pub mod record;
pub mod report;
pub mod route;
pub mod server;
pub mod store;
pub mod submission;
