//! Packing derived records into the two output modules.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use scribe_esm::FileHeader;
use tracing::info;

use crate::{Derivation, Error, Result};

/// File name of the module with scripts, spells and scrolls.
pub const SCRIBE_MODULE: &str = "scribe_scrolls.omwaddon";

/// File name of the module with restricted merchants.
pub const NO_SALE_MODULE: &str = "no_spells_for_sale.omwaddon";

/// Author written to both module headers.
pub const AUTHOR: &str = "scribe";

pub const SCRIBE_DESCRIPTION: &str = "scribe scrolls: scrolls from all mods (at the time of creation) can be learned. \
Scrolls with a magicka cost above 200 will have their cost randomized between 180-200. \
Requires to be near the end of the load order.";

pub const NO_SALE_DESCRIPTION: &str = "no spells for sale: prevents all npcs from all mods (at the time of creation) \
from selling spells or spell scrolls in their inventory - due to a engine pecularity they will still sell scrolls \
if at their localization (on containers or in the world).";

/// Whether a path names one of the modules this tool writes.
///
/// Such files are skipped when scanning a load order.
pub fn is_own_output<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == SCRIBE_MODULE || name == NO_SALE_MODULE)
}

/// Locations of the written modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub scribe: PathBuf,
    pub no_sale: PathBuf,
}

/// Builds and writes the output modules.
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    author: String,
    scribe_description: String,
    no_sale_description: String,
}

impl Default for OutputAssembler {
    fn default() -> Self {
        Self {
            author: AUTHOR.to_string(),
            scribe_description: SCRIBE_DESCRIPTION.to_string(),
            no_sale_description: NO_SALE_DESCRIPTION.to_string(),
        }
    }
}

impl OutputAssembler {
    /// Use custom header descriptions.
    pub fn with_descriptions(scribe: impl Into<String>, no_sale: impl Into<String>) -> Self {
        Self {
            scribe_description: scribe.into(),
            no_sale_description: no_sale.into(),
            ..Self::default()
        }
    }

    /// Encode the scribe module: scripts, then spells, then scrolls.
    pub fn scribe_module(&self, derivation: &Derivation) -> Vec<u8> {
        let count = derivation.scripts.len() + derivation.spells.len() + derivation.scrolls.len();
        let mut out =
            FileHeader::new(self.author.as_str(), self.scribe_description.as_str(), count as u32).encode();

        for script in &derivation.scripts {
            out.extend_from_slice(&script.encode());
        }
        for spell in &derivation.spells {
            out.extend_from_slice(&spell.encode());
        }
        for scroll in &derivation.scrolls {
            out.extend_from_slice(&scroll.encode());
        }
        out
    }

    /// Encode the no-sale module.
    pub fn no_sale_module(&self, derivation: &Derivation) -> Vec<u8> {
        let count = derivation.npcs.len() as u32;
        let mut out =
            FileHeader::new(self.author.as_str(), self.no_sale_description.as_str(), count).encode();

        for npc in &derivation.npcs {
            out.extend_from_slice(&npc.encode());
        }
        out
    }

    /// Write both modules into `dir`, creating it if needed.
    ///
    /// Either both modules are replaced or neither is: they are staged as
    /// temp files first, and a failed rename restores the previous files.
    pub fn write<P: AsRef<Path>>(&self, dir: P, derivation: &Derivation) -> Result<OutputPaths> {
        let dir = dir.as_ref();
        let scribe = self.scribe_module(derivation);
        let no_sale = self.no_sale_module(derivation);

        fs::create_dir_all(dir).map_err(|source| Error::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let paths = OutputPaths {
            scribe: dir.join(SCRIBE_MODULE),
            no_sale: dir.join(NO_SALE_MODULE),
        };

        let scribe_tmp = stage(&paths.scribe, &scribe)?;
        let no_sale_tmp = match stage(&paths.no_sale, &no_sale) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&scribe_tmp);
                return Err(e);
            }
        };
        commit(&[
            (scribe_tmp, paths.scribe.as_path()),
            (no_sale_tmp, paths.no_sale.as_path()),
        ])?;

        info!(
            scribe = %paths.scribe.display(),
            no_sale = %paths.no_sale.display(),
            "wrote modules"
        );
        Ok(paths)
    }
}

fn write_error(path: &Path, source: io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `data` to a temp file next to `path` and return the temp path.
fn stage(path: &Path, data: &[u8]) -> Result<PathBuf> {
    let tmp = path.with_extension("omwaddon.tmp");

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    match written {
        Ok(()) => Ok(tmp),
        Err(source) => {
            let _ = fs::remove_file(&tmp);
            Err(write_error(path, source))
        }
    }
}

/// Move staged files over their targets, all or nothing.
///
/// Existing targets are moved aside first and put back if any step fails.
/// Temp files are removed on failure.
fn commit(staged: &[(PathBuf, &Path)]) -> Result<()> {
    let discard = || {
        for (tmp, _) in staged {
            let _ = fs::remove_file(tmp);
        }
    };

    for (_, target) in staged {
        if target.is_dir() {
            discard();
            let source = io::Error::new(io::ErrorKind::Other, "output path is a directory");
            return Err(write_error(target, source));
        }
    }

    let mut backups: Vec<(PathBuf, &Path)> = Vec::new();
    let restore = |backups: &[(PathBuf, &Path)]| {
        for (backup, target) in backups {
            let _ = fs::rename(backup, target);
        }
    };

    for (_, target) in staged {
        if !target.exists() {
            continue;
        }
        let backup = target.with_extension("omwaddon.bak");
        if let Err(source) = fs::rename(target, &backup) {
            restore(&backups[..]);
            discard();
            return Err(write_error(target, source));
        }
        backups.push((backup, *target));
    }

    for (i, (tmp, target)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, target) {
            for (_, done) in &staged[..i] {
                let _ = fs::remove_file(done);
            }
            discard();
            restore(&backups[..]);
            return Err(write_error(target, source));
        }
    }

    for (backup, _) in &backups {
        let _ = fs::remove_file(backup);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_esm::types::Script;
    use scribe_esm::{RecordScanner, Tag};

    #[test]
    fn test_own_output_names() {
        assert!(is_own_output("/data/mods/scribe_scrolls.omwaddon"));
        assert!(is_own_output("no_spells_for_sale.omwaddon"));
        assert!(!is_own_output("/data/Morrowind.esm"));
    }

    #[test]
    fn test_empty_derivation_writes_headers() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");

        let paths = OutputAssembler::default()
            .write(&out, &Derivation::default())
            .unwrap();

        assert_eq!(paths.scribe, out.join(SCRIBE_MODULE));
        for path in [&paths.scribe, &paths.no_sale] {
            let mut scanner = RecordScanner::open(path).unwrap();
            let record = scanner.next_record().unwrap().unwrap();
            let header = FileHeader::from_record(&record).unwrap();
            assert_eq!(header.record_count, 0);
            assert_eq!(header.author, AUTHOR);
            assert!(scanner.next_record().unwrap().is_none());
        }
        assert!(!out.join("scribe_scrolls.omwaddon.tmp").exists());
    }

    #[test]
    fn test_scribe_module_order_and_count() {
        let derivation = Derivation {
            scripts: vec![Script::new("lrn_a", "begin lrn_a\nend")],
            ..Derivation::default()
        };
        let assembler = OutputAssembler::with_descriptions("first", "second");
        let bytes = assembler.scribe_module(&derivation);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.omwaddon");
        fs::write(&path, &bytes).unwrap();

        let records: Vec<_> = RecordScanner::open(&path)
            .unwrap()
            .collect::<scribe_esm::Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        let header = FileHeader::from_record(&records[0]).unwrap();
        assert_eq!(header.description, "first");
        assert_eq!(header.record_count, 1);
        assert_eq!(records[1].tag, Tag::SCPT);
    }

    #[test]
    fn test_failed_write_leaves_both_modules_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let scribe = dir.path().join(SCRIBE_MODULE);
        let blocked = dir.path().join(NO_SALE_MODULE);
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();

        let result = OutputAssembler::default().write(dir.path(), &Derivation::default());

        assert!(matches!(result, Err(Error::Write { .. })));
        assert!(!scribe.exists());
        assert!(blocked.join("keep").exists());
        let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_module() {
        let dir = tempfile::tempdir().unwrap();
        let scribe = dir.path().join(SCRIBE_MODULE);
        fs::write(&scribe, b"previous run").unwrap();
        fs::create_dir(dir.path().join(NO_SALE_MODULE)).unwrap();

        assert!(OutputAssembler::default()
            .write(dir.path(), &Derivation::default())
            .is_err());
        assert_eq!(fs::read(&scribe).unwrap(), b"previous run");
    }

    #[test]
    fn test_rewrite_replaces_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(NO_SALE_MODULE);
        fs::write(&target, b"stale content that is longer than a header").unwrap();

        OutputAssembler::default()
            .write(dir.path(), &Derivation::default())
            .unwrap();

        let bytes = fs::read(&target).unwrap();
        assert_eq!(&bytes[..4], b"TES3");
    }
}
