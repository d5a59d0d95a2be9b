//! Bringing each user's birthdays calendar up to date.

use std::collections::HashMap;
use std::path::Path;

use rand::Rng;

use crate::birthdays::{BirthdayCalendar, is_valid_event_name};
use crate::change_set::ChangeSet;
use crate::collection::{self, Entries, Entry};
use crate::component::Component;
use crate::config::Settings;
use crate::error::BirthdayResult;
use crate::reconcile::{ContactRecord, ReconcilePlan, SyncStats};

/// Contacts with a birthday from all address books of a user, keyed by UID.
///
/// Contacts that cannot be joined to a birthday event (no UID, or a UID
/// that is not usable as a file name) are skipped with a warning.
pub fn collect_contacts(user_dir: &Path) -> BirthdayResult<HashMap<String, ContactRecord>> {
    let mut contacts = HashMap::new();

    for addressbook in collection::addressbooks(user_dir) {
        for entry in Entries::open(&user_dir.join(&addressbook))? {
            let Entry { path, component } = entry?;
            let Component::Contact(contact) = component else {
                continue;
            };
            if !contact.has_birthday() {
                continue;
            }

            let Some(uid) = contact.uid.clone() else {
                tracing::warn!(path = %path.display(), "contact with birthday but without UID");
                continue;
            };
            if !is_valid_event_name(&uid) {
                tracing::warn!(uid = %uid, path = %path.display(), "UID not usable as file name");
                continue;
            }

            let record = ContactRecord {
                collection: addressbook.clone(),
                path,
                contact,
            };
            if let Some(previous) = contacts.insert(uid.clone(), record) {
                tracing::warn!(
                    uid = %uid,
                    path = %previous.path.display(),
                    "duplicate contact UID, using the last one read"
                );
            }
        }
    }

    Ok(contacts)
}

/// Sync the birthdays calendar of one user directory.
pub fn sync_user<R: Rng + ?Sized>(
    user_dir: &Path,
    changed: &[String],
    settings: &Settings,
    rng: &mut R,
) -> BirthdayResult<SyncStats> {
    let contacts = collect_contacts(user_dir)?;
    let calendar = BirthdayCalendar::ensure(user_dir, settings.calendar_color(), rng)?;
    let existing = calendar.existing()?;

    let plan = ReconcilePlan::new(contacts, existing, changed, settings.uid_match);
    plan.apply(&calendar, settings.reminder_hours())
}

/// Sync every user of a change set, in order. Stops at the first error.
pub fn run<R: Rng + ?Sized>(
    change_set: &ChangeSet,
    settings: &Settings,
    rng: &mut R,
) -> BirthdayResult<SyncStats> {
    let storage_dir = settings.storage_dir();
    let mut total = SyncStats::default();

    for (user, changed) in change_set.users() {
        let user_dir = storage_dir.join(user);
        let stats = sync_user(&user_dir, changed, settings, rng)?;

        if stats.is_empty() {
            tracing::debug!(user, unchanged = stats.unchanged, "birthdays up to date");
        } else {
            tracing::info!(
                user,
                created = stats.created,
                updated = stats.updated,
                deleted = stats.deleted,
                unchanged = stats.unchanged,
                "birthdays synced"
            );
        }
        total += stats;
    }

    Ok(total)
}
