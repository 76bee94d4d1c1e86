//! Core types: assistants, threads, messages, runs.

pub mod assistant;
pub mod run;
pub mod thread;

pub use assistant::*;
pub use run::*;
pub use thread::*;
