//! Progress display for running reviews

pub mod reporter;
