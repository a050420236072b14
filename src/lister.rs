use anyhow::Result;
use std::path::Path;

/// Table of contents of one archive, one entry path per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListing {
    text: String,
}

impl EntryListing {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for entry in entries {
            text.push_str(entry.as_ref());
            text.push('\n');
        }
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.text.lines().filter(|l| !l.is_empty())
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

/// Produces the entry listing of an archive.
///
/// Implementations must be usable from several worker threads at once when a
/// scan runs with more than one job.
pub trait ArchiveLister: Send + Sync {
    fn list_entries(&self, archive: &Path) -> Result<EntryListing>;
}
