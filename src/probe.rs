use anyhow::{Context, Result};
use log::trace;
use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

use crate::lister::{ArchiveLister, EntryListing};

/// Reads the zip central directory in-process, no JDK needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipLister;

impl ArchiveLister for ZipLister {
    fn list_entries(&self, archive: &Path) -> Result<EntryListing> {
        let names = entry_names(archive)?;
        trace!("{} entries in {}", names.len(), archive.display());
        Ok(EntryListing::from_entries(names))
    }
}

/// Entry names in central-directory order, the same order `jar tf` prints.
pub fn entry_names(jar_path: &Path) -> Result<Vec<String>> {
    let file = File::open(jar_path).with_context(|| format!("cannot open jar: {}", jar_path.display()))?;
    // SAFETY: The file is opened read-only and outlives the mapping.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("mmap failed: {}", jar_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("cannot read zip structure: {}", jar_path.display()))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .with_context(|| format!("bad entry #{i} in {}", jar_path.display()))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}
