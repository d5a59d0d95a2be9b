//! Birthday events built from contacts.

use chrono::{Datelike, Duration, NaiveDate};

use crate::component::Contact;
use crate::error::{BirthdayError, BirthdayResult};

/// Year assigned to birthdays stored without one (`--MMDD`).
///
/// 1604 is a leap year, so `--0229` still yields a valid date, and it is
/// the year vCard exporters conventionally use to mark an omitted year.
pub const YEARLESS_BIRTHDAY_YEAR: i32 = 1604;

/// Summary used for contacts without a formatted name.
const UNNAMED_CONTACT: &str = "(No name)";

/// Display alarm attached to a birthday event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Hours before the start of the event. Negative values fire after it.
    pub hours_before: i64,
    /// Identifier of the alarm itself, distinct from the event UID.
    pub uid: String,
}

/// A yearly, all-day birthday event generated from a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayEvent {
    pub uid: String,
    pub summary: String,
    pub start: NaiveDate,
    pub reminder: Option<Reminder>,
}

impl BirthdayEvent {
    /// Build the event for a contact that carries a UID and a birthday.
    pub fn from_contact(
        uid: &str,
        contact: &Contact,
        reminder_hours: Option<i64>,
    ) -> BirthdayResult<Self> {
        let raw = contact.birthday.as_deref().unwrap_or_default();
        let start = parse_birthday(raw).ok_or_else(|| BirthdayError::InvalidBirthday {
            uid: uid.to_string(),
            value: raw.to_string(),
        })?;

        let reminder = reminder_hours.map(|hours_before| Reminder {
            hours_before,
            uid: uuid::Uuid::new_v4().to_string(),
        });

        Ok(BirthdayEvent {
            uid: uid.to_string(),
            summary: contact
                .full_name
                .clone()
                .unwrap_or_else(|| UNNAMED_CONTACT.to_string()),
            start,
            reminder,
        })
    }

    /// All-day events end on the following day (DTEND is exclusive).
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(1)
    }

    /// Recurrence rule: every year on the start's month and day, forever.
    pub fn rrule(&self) -> &'static str {
        "FREQ=YEARLY"
    }

    /// Whether the birthday was stored without a year.
    pub fn is_yearless(&self) -> bool {
        self.start.year() == YEARLESS_BIRTHDAY_YEAR
    }
}

/// Parse a vCard `BDAY` value.
///
/// Accepts, in this order: `YYYY-MM-DD`, `YYYYMMDD` and the year-less
/// `--MMDD`. The latter gets [`YEARLESS_BIRTHDAY_YEAR`].
pub fn parse_birthday(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        return Some(date);
    }

    let month_day = value.strip_prefix("--")?;
    if month_day.len() != 4 || !month_day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = month_day[..2].parse().ok()?;
    let day = month_day[2..].parse().ok()?;
    NaiveDate::from_ymd_opt(YEARLESS_BIRTHDAY_YEAR, month, day)
}
