//! Reading changed paths from stdin or files.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bdaycal_core::ChangeSet;

const STDIN: &str = "-";

/// Build the change set from the given files, or from stdin when none are
/// given. `-` stands for stdin as well.
pub fn read_change_set(files: &[PathBuf]) -> Result<ChangeSet> {
    let mut change_set = ChangeSet::default();

    if files.is_empty() {
        read_lines(io::stdin().lock(), &mut change_set).context("Could not read stdin")?;
        return Ok(change_set);
    }

    for file in files {
        if file == Path::new(STDIN) {
            read_lines(io::stdin().lock(), &mut change_set).context("Could not read stdin")?;
        } else {
            let reader = File::open(file)
                .map(BufReader::new)
                .with_context(|| format!("Could not open {}", file.display()))?;
            read_lines(reader, &mut change_set)
                .with_context(|| format!("Could not read {}", file.display()))?;
        }
    }

    Ok(change_set)
}

fn read_lines(reader: impl BufRead, change_set: &mut ChangeSet) -> io::Result<()> {
    for line in reader.lines() {
        change_set.push(&line?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_change_set_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        std::fs::write(&first, "collection-root/alice/contacts/a.vcf\n\njunk\n").unwrap();
        std::fs::write(&second, "collection-root/alice/contacts/b.vcf\r\n").unwrap();

        let change_set = read_change_set(&[first, second]).unwrap();

        assert_eq!(
            change_set.changes_for("collection-root/alice"),
            ["contacts/a.vcf", "contacts/b.vcf"]
        );
    }

    #[test]
    fn test_read_change_set_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = read_change_set(&[missing]).unwrap_err();
        assert!(err.to_string().starts_with("Could not open"), "{}", err);
    }
}
