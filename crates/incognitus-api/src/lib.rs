//! # incognitus-api
//!
//! Client for the Incognitus backend REST API. Every call checks the HTTP
//! status and turns error bodies (`{"detail": "..."}`) into
//! [`ClientError::Fetch`](incognitus_core::error::ClientError::Fetch).

mod client;
mod pager;
pub mod types;


pub use client::{BackendClient, INIT_DATA_HEADER};
pub use pager::InboxPager;
