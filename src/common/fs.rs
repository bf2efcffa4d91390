use std::{fs, io::Write, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Write `contents` to `target` through a temp file in the same directory, then rename.
pub(crate) fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("[common::fs] create dir {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("[common::fs] create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("[common::fs] write {}", target.display()))?;
    tmp.as_file().sync_all().ok(); // best-effort fsync
    tmp.persist(target)
        .with_context(|| format!("[common::fs] rename to {}", target.display()))?;

    log::debug!("[common::fs] wrote {} bytes to {}", contents.len(), target.display());
    Ok(())
}

/// Read a whole file as UTF-8.
pub(crate) fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("[common::fs] read {}", path.display()))
}

/// True if `candidate` names an existing regular file. Overlong or malformed
/// candidates (e.g. inline JSON) are treated as not-a-file.
pub(crate) fn is_existing_file(candidate: &str) -> bool {
    if candidate.len() > 4096 || candidate.contains('\n') || candidate.trim_start().starts_with('{') {
        return false;
    }
    Path::new(candidate).is_file()
}

/// Extracts the given `.zip` file into `dest_dir`.
#[cfg(feature = "shapefile")]
pub(crate) fn extract_zip(zip_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(zip_path)
        .with_context(|| format!("[common::fs] failed to open {}", zip_path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("[common::fs] failed to read zip archive {}", zip_path.display()))?;
    archive
        .extract(dest_dir)
        .with_context(|| format!("[common::fs] failed to extract {} to {}", zip_path.display(), dest_dir.display()))?;
    Ok(())
}

/// Files under `dir` (recursively) whose extension matches `ext`, sorted.
#[cfg(feature = "shapefile")]
pub(crate) fn find_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current)
            .with_context(|| format!("[common::fs] list {}", current.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|e| e.eq_ignore_ascii_case(ext)) {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/out/chart.js");
        write_atomic(&target, b"var x = 1;").unwrap();
        assert_eq!(read_text(&target).unwrap(), "var x = 1;");

        write_atomic(&target, b"var x = 2;").unwrap();
        assert_eq!(read_text(&target).unwrap(), "var x = 2;");
    }

    #[test]
    fn inline_json_is_not_a_file() {
        assert!(!is_existing_file("{\"type\": \"Topology\"}"));
        assert!(!is_existing_file("/definitely/not/here.json"));

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(is_existing_file(file.path().to_str().unwrap()));
    }

    #[cfg(feature = "shapefile")]
    #[test]
    fn finds_files_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("inner")).unwrap();
        fs::write(dir.path().join("inner/a.SHP"), b"").unwrap();
        fs::write(dir.path().join("b.dbf"), b"").unwrap();
        let found = find_with_extension(dir.path(), "shp").unwrap();
        assert_eq!(found, vec![dir.path().join("inner/a.SHP")]);
    }
}
