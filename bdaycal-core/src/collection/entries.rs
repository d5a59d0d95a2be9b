//! Lazy iteration over the items of one collection.

use std::collections::VecDeque;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};

use crate::collection::props::is_internal_file;
use crate::component::Component;
use crate::error::{BirthdayError, BirthdayResult};
use crate::ics::parse_components;

/// A decoded component together with the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub component: Component,
}

/// Iterator over every component of every item in a collection.
///
/// Files are read one at a time, in directory order. A file that fails
/// to decode yields an error.
pub struct Entries {
    dir: PathBuf,
    read_dir: Option<ReadDir>,
    pending: VecDeque<Entry>,
}

impl Entries {
    /// Start reading a collection directory. A missing directory yields
    /// nothing.
    pub fn open(dir: &Path) -> BirthdayResult<Self> {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(read_dir) => Some(read_dir),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(BirthdayError::io(dir, e)),
        };

        Ok(Entries {
            dir: dir.to_path_buf(),
            read_dir,
            pending: VecDeque::new(),
        })
    }

    /// Next item file of the collection, skipping directories and
    /// Radicale's own files.
    fn next_file(&mut self) -> Option<BirthdayResult<PathBuf>> {
        let read_dir = self.read_dir.as_mut()?;

        for entry in read_dir.by_ref() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => return Some(Err(BirthdayError::io(&self.dir, e))),
            };

            let name = entry.file_name();
            if name.to_str().is_some_and(is_internal_file) {
                continue;
            }

            match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => return Some(Ok(entry.path())),
                Err(e) => return Some(Err(BirthdayError::io(entry.path(), e))),
            }
        }

        None
    }

    fn load_file(&mut self, path: PathBuf) -> BirthdayResult<()> {
        let content = std::fs::read_to_string(&path).map_err(|e| BirthdayError::io(&path, e))?;

        let components = parse_components(&content).map_err(|message| BirthdayError::Decode {
            path: path.clone(),
            message,
        })?;

        self.pending
            .extend(components.into_iter().map(|component| Entry {
                path: path.clone(),
                component,
            }));
        Ok(())
    }
}

impl Iterator for Entries {
    type Item = BirthdayResult<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.pending.pop_front() {
                return Some(Ok(entry));
            }

            let path = match self.next_file()? {
                Ok(path) => path,
                Err(e) => return Some(Err(e)),
            };

            if let Err(e) = self.load_file(path) {
                return Some(Err(e));
            }
        }
    }
}
