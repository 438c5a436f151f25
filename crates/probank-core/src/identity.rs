//! Deterministic identity hashing for problems using blake3.
//!
//! A problem's external identity is derived from its source platform tag and
//! the platform's own problem identifier. The same pair always produces the
//! same hash, so the hash doubles as a deduplication key: before creating a
//! problem, clients look it up by generated id to see whether the platform
//! problem is already catalogued.
//!
//! # Determinism
//!
//! - Both inputs are length-framed (the field's byte length as little-endian
//!   `u64` before its bytes), so shifting bytes across the field boundary
//!   always changes the input stream: `("A", "BC")` and `("AB", "C")` hash
//!   differently.
//! - Any string inputs are accepted, including empty ones; the function is
//!   total and has no failure modes.

/// Computes the identity hash for a `(source, platform_problem_id)` pair.
///
/// Returns the lowercase hex digest of a blake3 hash over the length-framed
/// fields.
pub fn problem_identity(source: &str, platform_problem_id: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    frame(&mut hasher, source.as_bytes());
    frame(&mut hasher, platform_problem_id.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Feeds `bytes` into `hasher` preceded by its length.
fn frame(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_deterministic() {
        let first = problem_identity("CODEFORCES", "123A");
        let second = problem_identity("CODEFORCES", "123A");
        assert_eq!(first, second, "same inputs must produce the same hash");
    }

    #[test]
    fn identity_changes_with_platform_problem_id() {
        let a = problem_identity("CODEFORCES", "123A");
        let b = problem_identity("CODEFORCES", "123B");
        assert_ne!(a, b, "different platform ids must produce different hashes");
    }

    #[test]
    fn identity_changes_with_source() {
        let a = problem_identity("CODEFORCES", "123A");
        let b = problem_identity("OTHER", "123A");
        assert_ne!(a, b, "different sources must produce different hashes");
    }

    #[test]
    fn field_boundary_shifts_do_not_collide() {
        // Without length framing these two pairs would feed the hasher the
        // identical byte stream "ABC".
        let a = problem_identity("A", "BC");
        let b = problem_identity("AB", "C");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_inputs_are_accepted() {
        let both_empty = problem_identity("", "");
        let one_empty = problem_identity("", "X");
        assert_ne!(both_empty, one_empty);
        assert_eq!(both_empty.len(), 64, "blake3 hex digest is 64 chars");
    }
}
