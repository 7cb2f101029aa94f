use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use nds_verify_core::{HexDigest, ImageHashes};
use sha1::Digest;

use crate::error::HashError;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Options for a hashing pass.
#[derive(Default)]
pub struct HashOptions<'a> {
    /// Expected total size, passed through to the progress callback
    pub total: Option<u64>,
    /// Called after every chunk with (bytes_processed, total_bytes)
    pub progress: Option<&'a dyn Fn(u64, u64)>,
    /// Checked between chunks; when set the pass stops with `HashError::Cancelled`
    pub cancel: Option<&'a AtomicBool>,
}

/// Compute CRC32, MD5, SHA-1 and SHA-256 of a stream in a single pass.
///
/// The stream is read once, forward only, in 64 KB chunks, so memory use
/// does not depend on the image size. A cancelled pass cannot be resumed.
pub fn hash_reader<R: Read + ?Sized>(
    reader: &mut R,
    options: &HashOptions<'_>,
) -> Result<ImageHashes, HashError> {
    let mut crc = crc32fast::Hasher::new();
    let mut md5_ctx = md5::Context::new();
    let mut sha1_ctx = sha1::Sha1::new();
    let mut sha256_ctx = sha2::Sha256::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut processed: u64 = 0;
    let total = options.total.unwrap_or(0);

    loop {
        if let Some(cancel) = options.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(HashError::Cancelled { processed });
            }
        }

        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        crc.update(&buf[..n]);
        md5_ctx.consume(&buf[..n]);
        sha1_ctx.update(&buf[..n]);
        sha256_ctx.update(&buf[..n]);
        processed += n as u64;

        if let Some(progress) = options.progress {
            progress(processed, total);
        }
    }

    Ok(ImageHashes {
        size: processed,
        crc32: HexDigest::from_bytes(&crc.finalize().to_be_bytes()),
        md5: HexDigest::from_bytes(&md5_ctx.compute().0),
        sha1: HexDigest::from_bytes(&sha1_ctx.finalize()),
        sha256: HexDigest::from_bytes(&sha256_ctx.finalize()),
    })
}

/// Hash a file on disk. The file length is used as the progress total.
pub fn hash_file(
    path: &Path,
    progress: Option<&dyn Fn(u64, u64)>,
    cancel: Option<&AtomicBool>,
) -> Result<ImageHashes, HashError> {
    let file = std::fs::File::open(path)?;
    let total = file.metadata()?.len();
    let mut reader = std::io::BufReader::new(file);
    let options = HashOptions {
        total: Some(total),
        progress,
        cancel,
    };
    hash_reader(&mut reader, &options)
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
