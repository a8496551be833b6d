//! Type registry and semantic model.
//!
//! This crate turns parsed source trees into a resolved model of the types
//! they declare: fully-qualified names, members with resolved types,
//! attribute usages bound to their attribute classes, and evaluated
//! constants.
//!
//! ## Architecture
//!
//! - **Pass 1 (Registration)**: register every type declaration, merging partials
//! - **Pass 2 (Completion)**: resolve usings, members, attributes and constants
//!
//! ## Modules
//!
//! - [`compilation`]: [`Compilation`] and its builder, the entry point
//! - [`const_eval`]: constant expression evaluation
//! - [`namespace_tree`]: namespace graph with per-namespace type indexes
//! - [`passes`]: the two passes
//! - [`registry`]: [`TypeRegistry`] storage and display helpers
//! - [`resolver`]: name lookup from syntax to types
//! - [`scope`]: lookup scopes built from namespaces and `using` directives

pub mod compilation;
pub mod const_eval;
pub mod namespace_tree;
pub mod passes;
pub mod registry;
pub mod resolver;
pub mod scope;

pub use compilation::{Compilation, CompilationBuilder, CompilationError, SourceTree};
pub use namespace_tree::{NamespaceTree, ResolutionResult};
pub use passes::{CompletionOutput, CompletionPass, RegistrationOutput, RegistrationPass};
pub use registry::TypeRegistry;
pub use resolver::TypeResolver;
pub use scope::{AliasTarget, Scope, ScopeLevel};
