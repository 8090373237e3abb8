//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Replace the contents of `path` in a single step.
///
/// The content is written to a sibling temporary file which is then renamed
/// over `path`, so readers see either the old or the new file, never a
/// partial one.
///
/// # Errors
///
/// Returns an error if the parent cannot be created, the temporary file
/// cannot be written, or the rename fails.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    let file_name = path
        .file_name()
        .with_context(|| format!("no file name in {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".bootstrap-tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, content).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e)
            .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()));
    }
    Ok(())
}

/// Copy `src` into directory `dir`, keeping its file name.
///
/// # Errors
///
/// Returns an error if `src` has no file name or the copy fails.
pub fn copy_into(src: &Path, dir: &Path) -> Result<()> {
    let name = src
        .file_name()
        .with_context(|| format!("no file name in {}", src.display()))?;
    let dst = dir.join(name);
    std::fs::copy(src, &dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").exists());
    }

    #[test]
    fn write_atomic_creates_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("out.txt");
        write_atomic(&path, "one").unwrap();
        write_atomic(&path, "two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("sub"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1, "temporary file must not remain");
    }

    #[test]
    fn copy_into_keeps_name() {
        let src_dir = tempfile::tempdir().unwrap();
        let dst_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join(".zshrc");
        std::fs::write(&src, "rc").unwrap();
        copy_into(&src, dst_dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(dst_dir.path().join(".zshrc")).unwrap(),
            "rc"
        );
    }
}
