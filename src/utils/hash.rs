//! Content fingerprinting using blake3.
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let fp = hash::fingerprint("body{color:red}"); // -> "a1b2c3d4"
//! ```

use std::io::{self, Read};
use std::path::Path;

/// Number of hex characters in a fingerprint (4 digest bytes).
pub const FINGERPRINT_LEN: usize = 8;

/// Compute an 8-char lowercase hex fingerprint of byte data.
///
/// Used for cache-busting filenames (e.g. `style.a1b2c3d4.css`) and
/// manifest digests.
#[inline]
pub fn fingerprint<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let digest = blake3::hash(data.as_ref());
    hex::encode(&digest.as_bytes()[..FINGERPRINT_LEN / 2])
}

/// Compute a fingerprint from a reader (streaming, for large files).
pub fn fingerprint_reader(mut reader: impl Read) -> io::Result<String> {
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(hex::encode(
        &hasher.finalize().as_bytes()[..FINGERPRINT_LEN / 2],
    ))
}

/// Compute a fingerprint of a file's final on-disk bytes.
pub fn fingerprint_file(path: &Path) -> io::Result<String> {
    let file = std::fs::File::open(path)?;
    fingerprint_reader(std::io::BufReader::with_capacity(64 * 1024, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint("body{color:red}");
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("same input"), fingerprint("same input"));
        assert_ne!(fingerprint("input a"), fingerprint("input b"));
    }

    #[test]
    fn test_fingerprint_file_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.js");
        fs::write(&path, "console.log(1)").unwrap();

        assert_eq!(
            fingerprint_file(&path).unwrap(),
            fingerprint("console.log(1)")
        );
    }

    #[test]
    fn test_fingerprint_reader_streams() {
        let data = vec![0xabu8; 256 * 1024];
        assert_eq!(fingerprint_reader(&data[..]).unwrap(), fingerprint(&data));
    }
}
