//! Vintly Client - the browser side of the marketplace demo as a library.
//!
//! Everything the storefront UI keeps on the device lives here:
//!
//! - [`storage`] - a localStorage-shaped key/value engine (file-backed or
//!   in-memory), one serialized JSON collection per named key
//! - [`sync`] - the change bus that keeps every mounted view consistent:
//!   stores publish an event after every successful mutation, subscribers
//!   re-read wholesale
//! - [`stores`] - one repository per entity family (listings, favorites,
//!   users, admin session, messages)
//! - [`wizard`] - the six-stage listing flow as an explicit state machine
//!   driven by a single reducer
//! - [`api`] - the HTTP client for the remote product service, used by the
//!   wizard's Publish action and the photo enhancement flow
//!
//! Local reads and writes are synchronous and never suspend; only the
//! [`api`] module talks to the network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod storage;
pub mod stores;
pub mod sync;
pub mod wizard;

pub use storage::{FileStorage, MemoryStorage, StorageEngine};
pub use stores::LocalStores;
pub use sync::{ChangeBus, StoreEvent};
