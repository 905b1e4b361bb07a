// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., P_K7NP3X for projects)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Project (P_)
    Project,
    /// Skill (K_)
    Skill,
    /// Experience (X_)
    Experience,
    /// Qualification (Q_)
    Qualification,
    /// Testimonial (S_) - S for Story/Statement
    Testimonial,
    /// Contact message (M_)
    Message,
    /// Visit record (W_) - W for Watch/View
    Visit,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Project => "P",
            EntityPrefix::Skill => "K",
            EntityPrefix::Experience => "X",
            EntityPrefix::Qualification => "Q",
            EntityPrefix::Testimonial => "S",
            EntityPrefix::Message => "M",
            EntityPrefix::Visit => "W",
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
/// # Arguments
/// * `prefix` - The entity type prefix
///
/// # Returns
/// A string in format "PREFIX_XXXXXX" (e.g., "P_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
/// Useful for nonces or other non-entity identifiers
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Project ID (P_XXXXXX)
pub fn generate_project_id() -> String {
    generate_id(EntityPrefix::Project)
}

/// Generate a Skill ID (K_XXXXXX)
pub fn generate_skill_id() -> String {
    generate_id(EntityPrefix::Skill)
}

/// Generate an Experience ID (X_XXXXXX)
pub fn generate_experience_id() -> String {
    generate_id(EntityPrefix::Experience)
}

/// Generate a Qualification ID (Q_XXXXXX)
pub fn generate_qualification_id() -> String {
    generate_id(EntityPrefix::Qualification)
}

/// Generate a Testimonial ID (S_XXXXXX)
pub fn generate_testimonial_id() -> String {
    generate_id(EntityPrefix::Testimonial)
}

/// Generate a Message ID (M_XXXXXX)
pub fn generate_message_id() -> String {
    generate_id(EntityPrefix::Message)
}

/// Generate a Visit ID (W_XXXXXX)
pub fn generate_visit_id() -> String {
    generate_id(EntityPrefix::Visit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_id_format() {
        let user_id = generate_user_id();
        assert!(user_id.starts_with("U_"));
        assert_eq!(user_id.len(), 8); // "U_" + 6 chars

        let project_id = generate_project_id();
        assert!(project_id.starts_with("P_"));
        assert_eq!(project_id.len(), 8);
    }

    #[test]
    fn test_crockford_alphabet_only() {
        let id = generate_project_id();
        let random_part = &id[2..]; // Skip "P_"

        for c in random_part.chars() {
            assert!(
                CROCKFORD_ALPHABET.contains(&(c as u8)),
                "Character '{}' not in Crockford alphabet",
                c
            );
        }

        // Verify no ambiguous characters
        assert!(!random_part.contains('I'));
        assert!(!random_part.contains('L'));
        assert!(!random_part.contains('O'));
        assert!(!random_part.contains('U'));
    }

    #[test]
    fn test_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_project_id();
            assert!(ids.insert(id), "Duplicate ID generated");
        }
    }

    #[test]
    fn test_all_prefixes() {
        assert!(generate_user_id().starts_with("U_"));
        assert!(generate_project_id().starts_with("P_"));
        assert!(generate_skill_id().starts_with("K_"));
        assert!(generate_experience_id().starts_with("X_"));
        assert!(generate_qualification_id().starts_with("Q_"));
        assert!(generate_testimonial_id().starts_with("S_"));
        assert!(generate_message_id().starts_with("M_"));
        assert!(generate_visit_id().starts_with("W_"));
    }

    #[test]
    fn test_raw_id() {
        let raw = generate_raw_id(32);
        assert_eq!(raw.len(), 32);
        assert!(!raw.contains('_')); // No prefix separator
    }
}
