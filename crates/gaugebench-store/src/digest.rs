//! Streaming SHA-256 over readers and files.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use gaugebench_core::{Sha256Hash, Sha256Stream};

use crate::error::{Result, StoreError};

/// Chunk size used when streaming artifacts.
pub const DIGEST_CHUNK_SIZE: usize = 64 * 1024;

/// Digest everything a reader yields, `chunk_size` bytes at a time.
pub fn digest_reader<R: Read>(mut reader: R, chunk_size: usize) -> std::io::Result<Sha256Hash> {
    let mut stream = Sha256Stream::new();
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => stream.update(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(stream.finalize())
}

/// Open `path` once and digest its contents in `chunk_size` pieces.
pub fn digest_file(path: &Path, chunk_size: usize) -> Result<Sha256Hash> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    digest_reader(file, chunk_size).map_err(|e| StoreError::io(path, e))
}
