use sha2::{Digest, Sha256};

/// Canonical content fingerprint: SHA-256 hex digest of the raw audio bytes.
///
/// Hashes are computed caller-side; this is the one function callers and
/// tests should agree on.
pub fn content_hash(data: &[u8]) -> String {
	hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_digest() {
		assert_eq!(content_hash(b"abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
	}

	#[test]
	fn empty_input_hashes() {
		assert_eq!(content_hash(b"").len(), 64);
	}
}
