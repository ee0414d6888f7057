//! # todo-api — Axum API Service for Todo Items
//!
//! ## Startup
//!
//! ```text
//! configure(config, env, services)   register provider, router, middleware,
//!                                    database config, migrations
//! Application::build(services)       wire router + middleware + pool (no I/O)
//! Application::migrate()             apply pending migrations
//! Application::serve(listener)       accept traffic
//! ```
//!
//! Any failure before `serve` aborts startup.
//!
//! ## API Surface
//!
//! | Path               | Module             |
//! |--------------------|--------------------|
//! | `/todos`, `/todos/{id}` | [`routes::todos`] |
//! | `/`, `/hello`, `/health/*` | [`routes`] |
//! | `/openapi.json`    | [`openapi`]        |

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod migrations;
pub mod openapi;
pub mod provider;
pub mod routes;
pub mod services;
pub mod state;

pub use app::Application;
pub use bootstrap::{configure, configure_with, BootstrapError};
pub use services::Services;
