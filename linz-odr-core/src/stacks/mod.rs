//! Stack descriptions (deterministic JSON generation)
//!
//! Each stack is described by a plain builder that reads role ARNs from
//! context and returns a serialisable record of the resources it declares.
//! Nothing here talks to AWS.

pub mod app;
pub mod console;
pub mod dataset;
pub mod resources;

pub use app::{AppDescription, OpenDataApp, StackDescription, DEFAULT_REGION};
pub use console::{ConsoleStack, ConsoleStackDescription};
pub use dataset::{DatasetStack, DatasetStackDescription};
