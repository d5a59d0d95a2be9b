//! Typed components decoded from collection items.
//!
//! Items on disk are vCards in address books and iCalendar objects in
//! calendars. Only the handful of fields the birthday sync looks at are
//! kept; everything else is dropped at decode time.

/// A contact from an address book (a `VCARD` component).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub uid: Option<String>,
    /// Formatted name (`FN`).
    pub full_name: Option<String>,
    /// Raw `BDAY` value, in whatever encoding the client wrote.
    pub birthday: Option<String>,
}

impl Contact {
    pub fn has_birthday(&self) -> bool {
        self.birthday.is_some()
    }
}

/// An event from a calendar (a `VEVENT` component).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub uid: Option<String>,
    pub summary: Option<String>,
}

/// One decoded component of a collection item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Contact(Contact),
    Event(EventEntry),
    /// Anything else (`VTIMEZONE`, `VTODO`, ...), by component name.
    Other(String),
}

impl Component {
    pub fn as_contact(&self) -> Option<&Contact> {
        match self {
            Component::Contact(contact) => Some(contact),
            _ => None,
        }
    }

    pub fn into_contact(self) -> Option<Contact> {
        match self {
            Component::Contact(contact) => Some(contact),
            _ => None,
        }
    }

    pub fn into_event(self) -> Option<EventEntry> {
        match self {
            Component::Event(event) => Some(event),
            _ => None,
        }
    }
}
