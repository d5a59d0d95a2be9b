//! The per-user birthdays calendar collection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::birthday_event::BirthdayEvent;
use crate::collection::props::{CollectionProps, TAG_CALENDAR, is_internal_file};
use crate::collection::{Entries, Entry};
use crate::component::EventEntry;
use crate::error::{BirthdayError, BirthdayResult};
use crate::ics::generate_ics;

/// Name of the birthdays collection inside a user directory.
pub const BIRTHDAYS_COLLECTION: &str = "birthdays";

const DISPLAY_NAME: &str = "Birthdays";
const DESCRIPTION: &str = "[AUTO GENERATED] Birthdays from all addressbooks";

/// Digits a random calendar color is drawn from.
const COLOR_PALETTE: &[u8] = b"0123456abcdef";

/// An existing birthday event and the file holding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEntry {
    pub path: PathBuf,
    pub event: EventEntry,
}

pub struct BirthdayCalendar {
    dir: PathBuf,
}

impl BirthdayCalendar {
    pub fn path_for(user_dir: &Path) -> PathBuf {
        user_dir.join(BIRTHDAYS_COLLECTION)
    }

    /// Make sure the collection and its props exist.
    ///
    /// Props are only written when missing, so a color picked once stays.
    /// `color` overrides the random pick for a new collection.
    pub fn ensure<R: Rng + ?Sized>(
        user_dir: &Path,
        color: Option<&str>,
        rng: &mut R,
    ) -> BirthdayResult<Self> {
        let dir = Self::path_for(user_dir);
        std::fs::create_dir_all(&dir).map_err(|e| BirthdayError::io(&dir, e))?;

        if !CollectionProps::path(&dir).exists() {
            let color = match color {
                Some(color) => color.to_string(),
                None => random_color(rng),
            };
            let props = CollectionProps {
                supported_components: Some("VEVENT".to_string()),
                display_name: Some(DISPLAY_NAME.to_string()),
                description: Some(DESCRIPTION.to_string()),
                color: Some(format!("#{}", color)),
                tag: TAG_CALENDAR.to_string(),
            };
            props.save(&dir)?;
            tracing::info!(path = %dir.display(), "created birthdays calendar");
        }

        Ok(BirthdayCalendar { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Every component stored in the collection.
    pub fn entries(&self) -> BirthdayResult<Entries> {
        Entries::open(&self.dir)
    }

    /// Existing birthday events, keyed by event UID.
    ///
    /// Components that are not events, or events without a UID, are not
    /// birthdays this tool wrote and are left alone.
    pub fn existing(&self) -> BirthdayResult<HashMap<String, BirthdayEntry>> {
        let mut existing = HashMap::new();

        for entry in self.entries()? {
            let Entry { path, component } = entry?;
            let Some(event) = component.into_event() else {
                continue;
            };
            let Some(uid) = event.uid.clone() else {
                tracing::warn!(path = %path.display(), "birthday event without UID");
                continue;
            };
            existing.insert(uid, BirthdayEntry { path, event });
        }

        Ok(existing)
    }

    /// File a birthday with the given UID is stored in.
    pub fn event_path(&self, uid: &str) -> PathBuf {
        self.dir.join(uid)
    }

    /// Write (or overwrite) the file for a birthday event.
    pub fn write_event(&self, event: &BirthdayEvent) -> BirthdayResult<PathBuf> {
        let path = self.event_path(&event.uid);
        std::fs::write(&path, generate_ics(event)).map_err(|e| BirthdayError::io(&path, e))?;
        Ok(path)
    }
}

/// Whether a UID can name a file in the collection.
pub fn is_valid_event_name(uid: &str) -> bool {
    !uid.is_empty()
        && uid != "."
        && uid != ".."
        && !uid.contains(['/', '\\'])
        && !is_internal_file(uid)
}

/// Six independent draws from the palette.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..6)
        .filter_map(|_| COLOR_PALETTE.choose(rng))
        .map(|&b| b as char)
        .collect()
}
