use std::io::Write;
use std::path::Path;

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `contents` to `path` atomically.
///
/// Data goes to a temporary file in the destination directory which is then
/// renamed over `path`. If anything fails before the rename, the previous file
/// is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Returns `true` if `path` equals `dir` or lies somewhere beneath it.
///
/// Both paths are canonicalized first; a path that cannot be resolved is
/// treated as not inside.
pub fn is_within(path: &Path, dir: &Path) -> std::io::Result<bool> {
    let path = path.canonicalize()?;
    let dir = dir.canonicalize()?;
    Ok(path.starts_with(&dir))
}
