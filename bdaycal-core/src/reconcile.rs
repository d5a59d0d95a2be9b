//! Deciding which birthday events to delete, keep or regenerate.
//!
//! The join key is the UID: a birthday event carries the UID of the
//! contact it was generated from, and lives in a file named after it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::birthday_event::BirthdayEvent;
use crate::birthdays::{BirthdayCalendar, BirthdayEntry};
use crate::component::Contact;
use crate::config::UidMatch;
use crate::error::{BirthdayError, BirthdayResult};

/// A contact with a birthday and where it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    /// Address book collection name.
    pub collection: String,
    pub path: PathBuf,
    pub contact: Contact,
}

/// A birthday to (re)write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regeneration {
    pub uid: String,
    pub record: ContactRecord,
    /// File of the birthday event this one replaces, if any.
    pub previous: Option<PathBuf>,
    /// Whether `previous` also holds events of other UIDs.
    pub shares_file: bool,
}

/// Outcome of comparing contacts against existing birthday events.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Birthdays whose contact is gone or lost its birthday.
    pub delete: Vec<(String, BirthdayEntry)>,
    /// Birthdays whose contact did not change in this run.
    pub keep: Vec<String>,
    /// New contacts and contacts touched by this run.
    pub regenerate: Vec<Regeneration>,
}

/// Statistics from applying a plan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

impl SyncStats {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}

impl std::ops::AddAssign for SyncStats {
    fn add_assign(&mut self, other: Self) {
        self.created += other.created;
        self.updated += other.updated;
        self.deleted += other.deleted;
        self.unchanged += other.unchanged;
    }
}

impl ReconcilePlan {
    /// Compare `contacts` and `existing` (both keyed by UID) in light of
    /// this run's `changed` paths (`<collection>/<file>`).
    pub fn new(
        mut contacts: HashMap<String, ContactRecord>,
        existing: HashMap<String, BirthdayEntry>,
        changed: &[String],
        rule: UidMatch,
    ) -> Self {
        let mut plan = ReconcilePlan::default();

        let mut events_per_file: HashMap<PathBuf, usize> = HashMap::new();
        for entry in existing.values() {
            *events_per_file.entry(entry.path.clone()).or_default() += 1;
        }

        for (uid, entry) in existing {
            match contacts.get(&uid) {
                None => plan.delete.push((uid, entry)),
                Some(record) => {
                    let touched = changed
                        .iter()
                        .any(|path| path_matches(rule, path, &record.collection, &uid));
                    if touched {
                        if let Some(record) = contacts.remove(&uid) {
                            let shares_file = events_per_file[&entry.path] > 1;
                            plan.regenerate.push(Regeneration {
                                uid,
                                record,
                                previous: Some(entry.path),
                                shares_file,
                            });
                        }
                    } else {
                        contacts.remove(&uid);
                        plan.keep.push(uid);
                    }
                }
            }
        }

        plan.regenerate
            .extend(contacts.into_iter().map(|(uid, record)| Regeneration {
                uid,
                record,
                previous: None,
                shares_file: false,
            }));

        plan.delete.sort_by(|a, b| a.0.cmp(&b.0));
        plan.keep.sort();
        plan.regenerate.sort_by(|a, b| a.uid.cmp(&b.uid));
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.regenerate.is_empty()
    }

    /// Delete stale birthdays, then write new and changed ones.
    pub fn apply(
        &self,
        calendar: &BirthdayCalendar,
        reminder_hours: Option<i64>,
    ) -> BirthdayResult<SyncStats> {
        let mut stats = SyncStats {
            unchanged: self.keep.len(),
            ..SyncStats::default()
        };

        for (uid, entry) in &self.delete {
            remove_if_present(&entry.path)?;
            tracing::debug!(
                uid = %uid,
                summary = entry.event.summary.as_deref().unwrap_or_default(),
                path = %entry.path.display(),
                "deleted birthday"
            );
            stats.deleted += 1;
        }

        for regeneration in &self.regenerate {
            let event = BirthdayEvent::from_contact(
                &regeneration.uid,
                &regeneration.record.contact,
                reminder_hours,
            )?;
            let path = calendar.write_event(&event)?;
            tracing::debug!(
                uid = %regeneration.uid,
                path = %path.display(),
                yearless = event.is_yearless(),
                "wrote birthday"
            );

            match &regeneration.previous {
                Some(previous) => {
                    // Files written under another name (e.g. `<uid>.ics`) are replaced
                    if *previous != path {
                        if regeneration.shares_file {
                            tracing::warn!(
                                uid = %regeneration.uid,
                                path = %previous.display(),
                                "previous birthday file holds other events, leaving it in place"
                            );
                        } else {
                            remove_if_present(previous)?;
                        }
                    }
                    stats.updated += 1;
                }
                None => stats.created += 1,
            }
        }

        Ok(stats)
    }
}

/// Several stale events in one file share a single delete.
fn remove_if_present(path: &Path) -> BirthdayResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BirthdayError::io(path, e)),
    }
}

/// Whether a changed path concerns the contact with this UID.
pub fn path_matches(rule: UidMatch, changed: &str, collection: &str, uid: &str) -> bool {
    match rule {
        UidMatch::Substring => changed.contains(uid),
        UidMatch::Exact => {
            let Some(file) = changed
                .strip_prefix(collection)
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                return false;
            };
            match file.strip_prefix(uid) {
                Some("") => true,
                Some(ext) => ext.starts_with('.') && !ext[1..].contains(['.', '/']),
                None => false,
            }
        }
    }
}
