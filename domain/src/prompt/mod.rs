//! Prompt domain
//!
//! Templates for the decision prompt sent to the model.

mod template;

pub use template::{DecisionPrompt, DecisionPromptTemplate};
