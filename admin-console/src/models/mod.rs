//! Wire types for the auth, media, live, AI and monitor services

pub mod ai;
pub mod auth;
pub mod common;
pub mod live;
pub mod media;
pub mod monitor;

pub use common::{non_empty, Ack, Envelope, Page, Pagination, SortOrder, SUCCESS_CODE};
