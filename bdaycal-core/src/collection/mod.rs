//! Collections inside a user directory and the items they hold.

mod entries;
pub mod props;

pub use entries::{Entries, Entry};
pub use props::CollectionProps;

use std::collections::BTreeMap;
use std::path::Path;

/// Map every collection of a user to its declared tag.
///
/// Collections whose props are missing or unreadable are left out. A
/// missing user directory yields an empty map.
pub fn user_collections(user_dir: &Path) -> BTreeMap<String, String> {
    let Ok(dir_entries) = std::fs::read_dir(user_dir) else {
        return BTreeMap::new();
    };

    dir_entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let props = CollectionProps::load(&path)?;
            Some((name, props.tag))
        })
        .collect()
}

/// Names of a user's address book collections.
pub fn addressbooks(user_dir: &Path) -> Vec<String> {
    user_collections(user_dir)
        .into_iter()
        .filter(|(_, tag)| tag == props::TAG_ADDRESSBOOK)
        .map(|(name, _)| name)
        .collect()
}
