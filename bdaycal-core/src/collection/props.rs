//! Collection metadata (`.Radicale.props`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BirthdayError, BirthdayResult};

/// File holding a collection's properties, as a flat JSON object.
pub const PROPS_FILE: &str = ".Radicale.props";

/// Tag of address book collections.
pub const TAG_ADDRESSBOOK: &str = "VADDRESSBOOK";

/// Tag of calendar collections.
pub const TAG_CALENDAR: &str = "VCALENDAR";

/// The collection properties this tool reads or writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionProps {
    #[serde(
        rename = "C:supported-calendar-component-set",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_components: Option<String>,

    #[serde(rename = "D:displayname", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(
        rename = "C:calendar-description",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(rename = "ICAL:calendar-color", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub tag: String,
}

impl CollectionProps {
    pub fn path(collection_dir: &Path) -> std::path::PathBuf {
        collection_dir.join(PROPS_FILE)
    }

    /// Read the props of a collection. Any failure yields `None`; a
    /// collection without readable props has no recognized type.
    pub fn load(collection_dir: &Path) -> Option<Self> {
        let path = Self::path(collection_dir);
        let content = std::fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&content) {
            Ok(props) => Some(props),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "unreadable collection props");
                None
            }
        }
    }

    pub fn save(&self, collection_dir: &Path) -> BirthdayResult<()> {
        let path = Self::path(collection_dir);
        let content =
            serde_json::to_string(self).map_err(|e| BirthdayError::Serialization(e.to_string()))?;

        std::fs::write(&path, content).map_err(|e| BirthdayError::io(&path, e))
    }
}

/// Whether a file name belongs to Radicale's own bookkeeping.
pub fn is_internal_file(name: &str) -> bool {
    name.starts_with(".Radicale")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reads_tag_and_ignores_unknown_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROPS_FILE),
            r#"{"D:displayname": "Contacts", "CR:addressbook-description": "", "tag": "VADDRESSBOOK"}"#,
        )
        .unwrap();

        let props = CollectionProps::load(dir.path()).expect("Should load");
        assert_eq!(props.tag, TAG_ADDRESSBOOK);
        assert_eq!(props.display_name.as_deref(), Some("Contacts"));
    }

    #[test]
    fn test_load_tolerates_missing_and_malformed_props() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(CollectionProps::load(dir.path()), None);

        std::fs::write(dir.path().join(PROPS_FILE), "{not json").unwrap();
        assert_eq!(CollectionProps::load(dir.path()), None);

        std::fs::write(dir.path().join(PROPS_FILE), r#"{"D:displayname": "x"}"#).unwrap();
        assert_eq!(CollectionProps::load(dir.path()), None);

        std::fs::write(dir.path().join(PROPS_FILE), r#"{"tag": 3}"#).unwrap();
        assert_eq!(CollectionProps::load(dir.path()), None);
    }

    #[test]
    fn test_save_uses_radicale_keys() {
        let dir = tempfile::tempdir().unwrap();
        let props = CollectionProps {
            supported_components: Some("VEVENT".to_string()),
            display_name: Some("Birthdays".to_string()),
            description: None,
            color: Some("#0a1b2c".to_string()),
            tag: TAG_CALENDAR.to_string(),
        };
        props.save(dir.path()).unwrap();

        let written = std::fs::read_to_string(dir.path().join(PROPS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["C:supported-calendar-component-set"], "VEVENT");
        assert_eq!(value["D:displayname"], "Birthdays");
        assert_eq!(value["ICAL:calendar-color"], "#0a1b2c");
        assert_eq!(value["tag"], "VCALENDAR");
        assert!(value.get("C:calendar-description").is_none());
    }

    #[test]
    fn test_internal_file_names() {
        assert!(is_internal_file(".Radicale.props"));
        assert!(is_internal_file(".Radicale.cache"));
        assert!(!is_internal_file("c1.vcf"));
    }
}
