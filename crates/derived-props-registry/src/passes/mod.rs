//! Semantic passes.
//!
//! - [`registration`]: Pass 1 - register every type declaration and merge partials
//! - [`completion`]: Pass 2 - resolve members, attributes and constants

pub mod completion;
pub mod registration;

pub use completion::{CompletionOutput, CompletionPass};
pub use registration::{RegistrationOutput, RegistrationPass};
