//! Resolution of data and model paths relative to the running executable.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Joins `relative` onto the directory that holds the running executable.
///
/// The result is not canonicalised, so `..` segments are kept as written.
/// An absolute `relative` is returned unchanged.
pub fn resolve_absolute_path<P: AsRef<Path>>(relative: P) -> Result<PathBuf> {
    Ok(resolve_against(executable_dir()?, relative))
}

/// Same join as [`resolve_absolute_path`] with an explicit base directory.
pub fn resolve_against<B: AsRef<Path>, P: AsRef<Path>>(base_dir: B, relative: P) -> PathBuf {
    base_dir.as_ref().join(relative)
}

pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("executable {} has no parent directory", exe.display()),
        )
        .into()
    })
}
