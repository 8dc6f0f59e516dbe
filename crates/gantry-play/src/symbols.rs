//! Native-debug-symbols payloads
//!
//! The service accepts native debug symbols as a single zip. Callers may
//! point at an already-packaged zip file or at a symbols directory; the
//! directory case is zipped in memory before upload.

use std::io::{Cursor, Write};
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::Result;

/// Load the debug-symbols payload for upload.
///
/// A file is read as-is; a directory is zipped with entry names relative
/// to the directory root, in stable name order.
pub async fn load_debug_symbols(path: &Path) -> Result<Vec<u8>> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.is_dir() {
        zip_directory(path)
    } else {
        Ok(tokio::fs::read(path).await?)
    }
}

fn zip_directory(dir: &Path) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut count = 0usize;
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let name = relative.to_string_lossy().replace('\\', "/");
        zip.start_file(name, options)?;
        zip.write_all(&std::fs::read(entry.path())?)?;
        count += 1;
    }

    let cursor = zip.finish()?;
    debug!(dir = %dir.display(), files = count, "zipped debug symbols directory");
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ZIP_MAGIC: &[u8] = b"PK";

    #[tokio::test]
    async fn test_file_payload_is_read_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("symbols.zip");
        fs::write(&path, b"already packaged").unwrap();

        let payload = load_debug_symbols(&path).await.unwrap();
        assert_eq!(payload, b"already packaged");
    }

    #[tokio::test]
    async fn test_directory_payload_is_zipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("arm64-v8a")).unwrap();
        fs::write(tmp.path().join("arm64-v8a/libapp.so.sym"), b"symbols a").unwrap();
        fs::write(tmp.path().join("readme.txt"), b"symbols b").unwrap();

        let payload = load_debug_symbols(tmp.path()).await.unwrap();
        assert!(payload.starts_with(ZIP_MAGIC));

        let mut archive = zip::ZipArchive::new(Cursor::new(payload)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"arm64-v8a/libapp.so.sym".to_string()));
        assert!(names.contains(&"readme.txt".to_string()));
    }

    #[tokio::test]
    async fn test_missing_payload_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("absent");
        assert!(load_debug_symbols(&missing).await.is_err());
    }
}
