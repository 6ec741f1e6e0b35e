//! Client library for the AV Stream admin console.
//!
//! [`console::Console`] wires the shared [`http::ApiClient`], the typed
//! service adapters in [`api`] and the client-side stores in [`store`] over one
//! persisted session.

pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod locales;
pub mod middleware;
pub mod models;
pub mod notice;
pub mod router;
pub mod rtc;
pub mod session;
pub mod storage;
pub mod store;
pub mod utils;

pub use console::{Console, ConsoleBuilder};
pub use error::{ApiError, ConsoleError, Result};
