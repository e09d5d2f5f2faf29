//! Commands Layer
//!
//! Transport-agnostic handlers for the task endpoints. The HTTP glue decodes
//! the request into a `Session` and `FormData`, calls a handler, and turns
//! the result into a response using `Redirect::location` or
//! `CommandError::status`.

mod error;
mod task_cmd;


pub use error::{CommandError, CommandResult, Redirect};
pub use task_cmd::*;
