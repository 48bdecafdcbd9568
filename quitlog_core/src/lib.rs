#![forbid(unsafe_code)]

//! Core domain model for the quitlog smoking tracker.
//!
//! This crate provides:
//! - Domain types (sex, plan, time segments, user record)
//! - The segment timeline and the user profile state machine
//! - Questionnaire parsing and text views
//! - Persistence (record store, journal, CSV export)

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod timeline;
pub mod profile;
pub mod input;
pub mod view;
pub mod store;
pub mod journal;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use timeline::Timeline;
pub use profile::UserData;
pub use view::MenuCommand;
pub use journal::{EventSink, JournalEntry, JournalEvent, JsonlSink};
pub use export::export_timeline_csv;
