//! Core types for node-relay.
//!
//! This crate provides the domain types shared by the relay pipeline and the
//! HTTP ingress:
//!
//! - **Events**: the inbound state-change record posted by devices
//! - **Topics**: hierarchical bus addresses derived from event metadata
//! - **Messages**: the immutable unit handed from the queue to the dispatcher
//!
//! # Example
//!
//! ```
//! use node_relay_core::{derive_path, TopicPath};
//!
//! let topic = derive_path("statechange", "ITB-1101-CP1").unwrap();
//! assert_eq!(topic.as_str(), "statechange/ITB/1101");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod event;
pub mod message;
pub mod topic;

pub use error::{CoreError, Result};
pub use event::InboundEvent;
pub use message::QueuedMessage;
pub use topic::{derive_path, validate_route, TopicPath};
