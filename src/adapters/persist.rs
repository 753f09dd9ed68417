use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// Readers never observe a partially written file at `path`.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let temp = parent.join(format!(".{}.part", file_name.to_string_lossy()));
    fs::write(&temp, bytes)?;
    if let Err(err) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }
    Ok(())
}

/// Write `bytes` at `path`, or at `<stem>_<n>.<ext>` when that name is taken.
///
/// An existing file is never replaced, even by a concurrent writer in another
/// process. Returns the path that was written.
pub fn write_new(path: &Path, bytes: &[u8]) -> io::Result<PathBuf> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;
    let mut temp = Builder::new().prefix(".incoming").suffix(".part").tempfile_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    let mut bump = 0u32;
    loop {
        let candidate = if bump == 0 { path.to_path_buf() } else { bumped(path, bump)? };
        match temp.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                temp = err.file;
                bump += 1;
            }
            Err(err) => return Err(err.error),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
}

fn bumped(path: &Path, bump: u32) -> io::Result<PathBuf> {
    let stem = path
        .file_stem()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, bump, ext.to_string_lossy()),
        None => format!("{}_{}", stem, bump),
    };
    Ok(path.with_file_name(name))
}
