//! ICS generation for birthday events.

use crate::birthday_event::{BirthdayEvent, Reminder};
use chrono::{Duration, NaiveDate};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};

const PRODID: &str = "-//bdaycal//Birthdays//EN";

/// Generate .ics content for a birthday event
pub fn generate_ics(event: &BirthdayEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    // DTSTAMP - required by RFC 5545
    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    add_date_property(&mut ics_event, "DTSTART", event.start);
    add_date_property(&mut ics_event, "DTEND", event.end());

    ics_event.add_property("RRULE", event.rrule());

    if let Some(alarm) = event.reminder.as_ref().and_then(reminder_alarm) {
        ics_event.alarm(alarm);
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Display alarm `hours_before` hours ahead of the start, or `None` when
/// the offset does not fit a duration.
fn reminder_alarm(reminder: &Reminder) -> Option<Alarm> {
    let offset = Duration::try_hours(reminder.hours_before)?;
    let mut alarm = Alarm::display("Reminder", Trigger::before_start(offset));
    alarm.add_property("UID", &reminder.uid);
    Some(alarm)
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
/// - Remove DTSTAMP inside VALARM sections (not required by RFC 5545)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && line.starts_with("DTSTAMP:") {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}
