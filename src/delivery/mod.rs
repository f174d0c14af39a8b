// src/delivery/mod.rs

//! Notification delivery.
//!
//! This module owns everything that happens after a marker file has been
//! detected:
//! - looking up the registration id ([`identity`]),
//! - calling the remote service ([`client`]),
//! - reporting the result ([`outcome`]),
//! - deleting the marker file ([`step`]).
//!
//! It does not know about `notify` events or debouncing.

pub mod client;
pub mod identity;
pub mod outcome;
pub mod step;

pub use client::{HttpNotifyClient, NotifyClient, NotifyFuture, NotifyRequest};
pub use identity::{IdentityFuture, IdentityProvider, SharedIdentity, StaticIdentity};
pub use outcome::{ChannelOutcomeSink, LogOutcomeSink, NotifyOutcome, OutcomeSink};
pub use step::{deliver, DeliveryContext, DeliveryReport};
