//! Output formatting for review results

pub mod console;
pub mod envelope;
pub mod formatter;

pub use console::ConsoleFormatter;
pub use envelope::{Envelope, ErrorBody, JsonFormatter};
pub use formatter::OutputFormatter;
