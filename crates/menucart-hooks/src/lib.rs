//! Hook registry
//!
//! Extension points are named events. A *filter* threads a value through its
//! handlers, each one receiving the previous handler's result; an *action*
//! runs its handlers for their side effects and collects whatever they write
//! to the output buffer.
//!
//! Handlers run in ascending priority; handlers sharing a priority run in
//! the order they were registered.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod registry;

pub use registry::{ActionHandler, FilterHandler, HookRegistry, DEFAULT_PRIORITY};
