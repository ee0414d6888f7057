//! # todo-core — Domain Types for the Todo API
//!
//! Pure domain layer with no I/O. The API crate builds its bootstrap,
//! persistence and routing on top of these types.
//!
//! - [`model`]: the [`Model`] trait describing a persisted entity's schema,
//!   and the [`Todo`] entity itself.
//! - [`database`]: identifiers for configured databases.
//! - [`environment`]: the runtime environment the process was started in.
//! - [`error`]: validation errors raised by domain constructors.

pub mod database;
pub mod environment;
pub mod error;
pub mod model;

pub use database::DatabaseId;
pub use environment::Environment;
pub use error::ValidationError;
pub use model::{Model, Todo};
