//! # Event Bus Module
//!
//! Publish/subscribe channel between the editor core and whatever hosts it.
//!
//! ## Overview
//!
//! - The editor publishes typed events without knowing who listens
//! - Hosts filter by category and render notices, refresh layers, etc.
//! - Both synchronous handlers and tokio broadcast receivers are supported
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fieldmap_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Notice]),
//!     |event| {
//!         if let AppEvent::Notice(notice) = event {
//!             println!("{}", notice.message);
//!         }
//!     },
//! );
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
