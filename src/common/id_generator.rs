// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., U_K7NP3X for users)
//!
//! The alphabet excludes I, L, O, U so IDs stay unambiguous when read or
//! typed; 32^6 combinations per entity type.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User record (U_)
    User,
    /// File record (F_)
    File,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::File => "F",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// Returns a string in format "PREFIX_XXXXXX" (e.g., "U_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = generate_id(EntityPrefix::User);
        assert!(id.starts_with("U_"));
        assert_eq!(id.len(), 8);

        let id = generate_id(EntityPrefix::File);
        assert!(id.starts_with("F_"));
    }

    #[test]
    fn test_generated_id_alphabet() {
        let id = generate_id(EntityPrefix::File);
        for c in id[2..].chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "unexpected character {} in id {}",
                c,
                id
            );
        }
    }
}
