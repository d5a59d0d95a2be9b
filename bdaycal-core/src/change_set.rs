//! Grouping of changed storage paths by user.
//!
//! The storage hook hands us one path per line, relative to the storage
//! folder: `<root>/<user>/<collection>/<file>`. Anything else is noise and
//! gets dropped.

use std::collections::BTreeMap;

/// Radicale's item cache; changes in there never concern contacts.
const CACHE_MARKER: &str = "/.Radicale.cache/";

/// One classified changed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPath<'a> {
    pub root: &'a str,
    pub user: &'a str,
    pub collection: &'a str,
    pub file: &'a str,
}

impl<'a> ChangedPath<'a> {
    /// Classify a raw input line, or `None` if it is not a collection item.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.is_empty() || line.contains(CACHE_MARKER) {
            return None;
        }

        let mut parts = line.splitn(4, '/');
        let root = parts.next()?;
        let user = parts.next()?;
        let collection = parts.next()?;
        let file = parts.next()?;

        Some(ChangedPath {
            root,
            user,
            collection,
            file,
        })
    }

    /// Key the change is grouped under: `<root>/<user>`.
    pub fn user_key(&self) -> String {
        format!("{}/{}", self.root, self.user)
    }

    /// Path relative to the user directory: `<collection>/<file>`.
    pub fn relative(&self) -> String {
        format!("{}/{}", self.collection, self.file)
    }
}

/// Changed paths of one run, grouped by user.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    users: BTreeMap<String, Vec<String>>,
}

impl ChangeSet {
    /// Build a change set from raw input lines, dropping unrecognized ones.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut change_set = ChangeSet::default();
        for line in lines {
            change_set.push(line.as_ref());
        }
        change_set
    }

    /// Add one raw line. Returns false if the line was dropped.
    pub fn push(&mut self, line: &str) -> bool {
        match ChangedPath::parse(line) {
            Some(changed) => {
                self.users
                    .entry(changed.user_key())
                    .or_default()
                    .push(changed.relative());
                true
            }
            None => {
                tracing::debug!(line, "ignoring changed path");
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Users with changes, in key order.
    pub fn users(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.users
            .iter()
            .map(|(user, changes)| (user.as_str(), changes.as_slice()))
    }

    /// Changes of a single user, in input order.
    pub fn changes_for(&self, user: &str) -> &[String] {
        self.users.get(user).map(Vec::as_slice).unwrap_or_default()
    }
}
