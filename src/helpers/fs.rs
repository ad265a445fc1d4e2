use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

/// Write `content` next to `path` under a process-unique temporary name, then
/// rename it over `path`. Readers see either the old or the new file, never a
/// partial one. `mode` is applied to the temporary file before the rename.
pub async fn write_atomic(path: &Path, content: &[u8], mode: Option<u32>) -> io::Result<()> {
    let tmp = temp_path(path);
    let result = write_then_rename(&tmp, path, content, mode).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

async fn write_then_rename(tmp: &Path, path: &Path, content: &[u8], mode: Option<u32>) -> io::Result<()> {
    let mut file = tokio::fs::File::create(tmp).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    if let Some(mode) = mode {
        set_mode(tmp, mode).await?;
    }
    tokio::fs::rename(tmp, path).await
}

/// `<dir>/.<file_name>.<pid>.tmp`, in the same directory so the rename stays on one filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()))
}

#[cfg(unix)]
pub async fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
pub async fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
