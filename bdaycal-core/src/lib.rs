//! Birthday calendar synchronization for Radicale storage trees.
//!
//! Given the paths a storage hook reports as changed, this crate keeps a
//! `birthdays` calendar in every affected user directory in line with
//! the `BDAY` fields of the user's address books:
//! - `change_set` groups changed paths by user
//! - `collection` reads collection props and items
//! - `birthdays` manages the derived calendar collection
//! - `reconcile` decides what to delete, keep and regenerate
//! - `birthday_event` and `ics` build and serialize the events

pub mod birthday_event;
pub mod birthdays;
pub mod change_set;
pub mod collection;
pub mod component;
pub mod config;
pub mod error;
pub mod ics;
pub mod reconcile;
pub mod sync;

pub use change_set::ChangeSet;
pub use config::Settings;
pub use error::{BirthdayError, BirthdayResult};
pub use reconcile::SyncStats;
pub use sync::run;
