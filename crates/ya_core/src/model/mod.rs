//! Domain records for the notes and news applications.
//!
//! # Responsibility
//! - Define the canonical shapes shared by repositories, services and the
//!   web surface.
//!
//! # Invariants
//! - Ids are integer primary keys allocated in insertion order.
//! - Timestamps are Unix epoch milliseconds.
//! - Ownership is a plain `author_id`; there are no roles.

pub mod comment;
pub mod news;
pub mod note;
pub mod user;

/// Unix epoch milliseconds used by every timestamp column.
pub type EpochMillis = i64;

/// One day in epoch milliseconds.
pub const DAY_MILLIS: EpochMillis = 24 * 60 * 60 * 1000;
