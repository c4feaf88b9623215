//! Web front end for regdoc
//!
//! One HTML page with a question form, served by axum. The query handler is
//! only wired when an LLM credential is available.

mod launch;
mod page;
mod server;
pub mod ui;


pub use launch::{Launch, MISSING_CREDENTIAL, gate};
pub use page::{TITLE, render_page};
pub use server::{AppState, AskForm, error_message, router};
