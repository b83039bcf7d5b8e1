//! BLAKE3 content hashing for output file names

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, file_read_failed};

/// Placeholder replaced by the content hash in output patterns
pub const HASH_PLACEHOLDER: &str = "{hash}";

/// Number of hex characters of the digest used in file names
pub const HASH_LENGTH: usize = 16;

/// Calculate the BLAKE3 hex digest of a file
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| file_read_failed(path, e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| file_read_failed(path, e))?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

/// Short content hash of a file, as used in output file names
pub fn content_hash(path: &Path) -> Result<String> {
    let mut digest = hash_file(path)?;
    digest.truncate(HASH_LENGTH);
    Ok(digest)
}

/// Substitute `hash` for every `{hash}` in `pattern`
pub fn apply_pattern(pattern: &str, hash: &str) -> String {
    pattern.replace(HASH_PLACEHOLDER, hash)
}
