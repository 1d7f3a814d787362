//! Filesystem set, check

use crate::bog::{Bog, BogOkExt};
use crate::misc::ResultExt;
use crate::{dbog, ebog, get_or_bog};
use cfg_if::cfg_if;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// What [`symlink_force`] ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymlinkOutcome {
    Created,
    /// Something already stood at the target and was swapped for the link
    Replaced,
    /// Nothing was touched
    SourceMissing,
    Failed,
}

impl SymlinkOutcome {
    pub fn is_linked(&self) -> bool {
        matches!(self, SymlinkOutcome::Created | SymlinkOutcome::Replaced)
    }
}

pub fn is_symlink(path: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

/// Link `target` to `source`, replacing whatever is at `target`.
///
/// Never fails outright: problems are bogged as errors and reported through the outcome.
/// A relative `source` is resolved against the directory of `target`, as the link itself would be.
/// The remove-then-link step is not atomic against other writers.
pub fn symlink_force(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    bog: &dyn Bog,
) -> SymlinkOutcome {
    let source = source.as_ref();
    let target = target.as_ref();
    let error_prefix = format!("Failed to symlink {target:?} to {source:?}");

    if let Err(e) = fs::symlink_metadata(link_destination(source, target)) {
        // a path through a regular file is as missing as an absent one
        if matches!(
            e.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ) {
            ebog!(bog => "{error_prefix}: {e}");
            return SymlinkOutcome::SourceMissing;
        }
    }

    match symlink(source, target) {
        Ok(()) => return SymlinkOutcome::Created,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(e) => {
            ebog!(bog => "{error_prefix}: {e}");
            return SymlinkOutcome::Failed;
        }
    }

    dbog!(bog => "Replacing existing {target:?}");
    get_or_bog!(
        bog,
        remove_existing(target),
        error_prefix,
        SymlinkOutcome::Failed
    );

    if symlink(source, target)
        .prefix_err(&error_prefix)
        .or_err(bog)
        .is_some()
    {
        SymlinkOutcome::Replaced
    } else {
        SymlinkOutcome::Failed
    }
}

fn link_destination(source: &Path, target: &Path) -> PathBuf {
    match target.parent() {
        Some(dir) if source.is_relative() => dir.join(source),
        _ => source.to_path_buf(),
    }
}

fn remove_existing(target: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(target)?;
    if meta.is_dir() {
        fs::remove_dir(target)
    } else {
        fs::remove_file(target)
    }
}

fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    cfg_if! {
        if #[cfg(unix)] {
            std::os::unix::fs::symlink(src, dst)
        } else if #[cfg(windows)] {
            let metadata = fs::metadata(link_destination(src, dst))?;
            if metadata.is_dir() {
                std::os::windows::fs::symlink_dir(src, dst)
            } else {
                std::os::windows::fs::symlink_file(src, dst)
            }
        } else {
            let _ = (src, dst);
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "symlinks are not supported on this platform",
            ))
        }
    }
}

#[cfg(all(test, unix))]
mod test {
    use super::*;
    use crate::bog::{BogBuffer, BogLevel};

    #[test]
    fn creates_fresh_link() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let tgt = dir.path().join("link");
        fs::write(&src, "hello").unwrap();

        let bog = BogBuffer::new();
        assert_eq!(symlink_force(&src, &tgt, &bog), SymlinkOutcome::Created);
        assert!(is_symlink(&tgt));
        assert_eq!(fs::read_link(&tgt).unwrap(), src);
        assert!(bog.records().is_empty());
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let tgt = dir.path().join("tgt.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&tgt, "old").unwrap();

        let bog = BogBuffer::new();
        let outcome = symlink_force(&src, &tgt, &bog);
        assert_eq!(outcome, SymlinkOutcome::Replaced);
        assert!(outcome.is_linked());
        assert!(is_symlink(&tgt));
        assert_eq!(fs::read_link(&tgt).unwrap(), src);
        assert_eq!(fs::read_to_string(&tgt).unwrap(), "new");
    }

    #[test]
    fn replaces_existing_link() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        let tgt = dir.path().join("current");
        fs::write(&first, "1").unwrap();
        fs::write(&second, "2").unwrap();

        let bog = BogBuffer::new();
        assert_eq!(symlink_force(&first, &tgt, &bog), SymlinkOutcome::Created);
        assert_eq!(symlink_force(&second, &tgt, &bog), SymlinkOutcome::Replaced);
        assert_eq!(fs::read_link(&tgt).unwrap(), second);
    }

    #[test]
    fn missing_source_leaves_target_alone() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("nope");
        let tgt = dir.path().join("tgt.txt");
        fs::write(&tgt, "keep").unwrap();

        let bog = BogBuffer::new();
        assert_eq!(symlink_force(&src, &tgt, &bog), SymlinkOutcome::SourceMissing);
        assert!(!is_symlink(&tgt));
        assert_eq!(fs::read_to_string(&tgt).unwrap(), "keep");
        assert!(bog.contains(BogLevel::ERROR, "Failed to symlink"));
    }

    #[test]
    fn source_below_a_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain");
        let tgt = dir.path().join("tgt");
        fs::write(&plain, "file, not dir").unwrap();

        let bog = BogBuffer::new();
        assert_eq!(
            symlink_force(plain.join("child"), &tgt, &bog),
            SymlinkOutcome::SourceMissing
        );
        assert!(fs::symlink_metadata(&tgt).is_err());
        assert!(bog.contains(BogLevel::ERROR, "Failed to symlink"));
    }

    #[test]
    fn relative_source_resolves_from_link_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.txt"), "rel").unwrap();
        let tgt = dir.path().join("rel-link");

        let bog = BogBuffer::new();
        assert_eq!(
            symlink_force("data.txt", &tgt, &bog),
            SymlinkOutcome::Created
        );
        assert_eq!(fs::read_to_string(&tgt).unwrap(), "rel");
    }

    #[test]
    fn non_empty_dir_target_fails_without_panic() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let tgt = dir.path().join("occupied");
        fs::write(&src, "x").unwrap();
        fs::create_dir(&tgt).unwrap();
        fs::write(tgt.join("inner"), "y").unwrap();

        let bog = BogBuffer::new();
        assert_eq!(symlink_force(&src, &tgt, &bog), SymlinkOutcome::Failed);
        assert!(tgt.join("inner").exists());
        assert!(bog.contains(BogLevel::ERROR, "Failed to symlink"));
    }

    #[test]
    fn missing_target_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        fs::write(&src, "x").unwrap();

        let bog = BogBuffer::new();
        let outcome = symlink_force(&src, dir.path().join("no/such/dir/link"), &bog);
        assert_eq!(outcome, SymlinkOutcome::Failed);
        assert!(!outcome.is_linked());
    }
}
