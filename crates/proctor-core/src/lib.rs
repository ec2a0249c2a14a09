//! proctor-core: timed assessment session engine, scoring, and reports.
//!
//! This crate defines the test data model, the per-candidate session state
//! machine with its countdown clock, MCQ scoring, report building, and the
//! typed collections layered over an injected key-value store.

pub mod answers;
pub mod archive;
pub mod clock;
pub mod driver;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod store;

pub use error::SessionError;
