//! # incognitus-bridge
//!
//! Adapter over the chat container's injected bridge object. The bridge is
//! probed once; everything downstream goes through one maybe-present handle.

mod bridge;
pub mod host;
pub mod payload;

pub use bridge::{BackSubscription, Bridge};
pub use host::{HostAction, StaticHost};
pub use payload::{LaunchPayload, WebAppUser};
