//! BIP-39 seed phrase generation, validation and seed stretching

use bip39::{Language, Mnemonic};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::KeyError;

/// Supported phrase strengths. The word count fixes both the entropy and
/// the embedded checksum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseStrength {
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl PhraseStrength {
    fn entropy_bytes(self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }
}

/// Generate a new seed phrase from fresh OS entropy.
///
/// Fails only when the system entropy source is unavailable; that failure
/// is fatal and never retried here.
pub fn generate_phrase(strength: PhraseStrength) -> Result<String, KeyError> {
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(KeyError::EntropyUnavailable)?;

    let mnemonic =
        Mnemonic::from_entropy_in(Language::English, &entropy).map_err(KeyError::Mnemonic)?;
    Ok(mnemonic.to_string())
}

/// Validate a phrase against the wordlist and its embedded checksum.
/// Pure, no side effects.
pub fn validate_phrase(phrase: &str) -> Result<(), KeyError> {
    parse_phrase(phrase).map(|_| ())
}

/// Stretch a validated phrase (plus optional passphrase) into the 64-byte
/// master seed via PBKDF2-HMAC-SHA512 with the 2048 iterations fixed by
/// BIP-39. Identical inputs always yield identical output; recovery
/// correctness depends on it.
pub fn derive_seed(phrase: &str, passphrase: &str) -> Result<[u8; 64], KeyError> {
    let mnemonic = parse_phrase(phrase)?;
    Ok(mnemonic.to_seed_normalized(passphrase))
}

fn parse_phrase(phrase: &str) -> Result<Mnemonic, KeyError> {
    Mnemonic::parse_in_normalized(Language::English, phrase).map_err(|err| match err {
        bip39::Error::InvalidChecksum => KeyError::InvalidChecksum,
        bip39::Error::UnknownWord(_) | bip39::Error::BadWordCount(_) => KeyError::InvalidWordlist,
        other => KeyError::Mnemonic(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A valid 12-word BIP-39 mnemonic for testing.
    const TEST_MNEMONIC: &str =
        "abandon amount liar amount expire adjust cage candy arch gather drum buyer";

    /// The canonical all-`abandon` vector from the BIP-39 reference suite.
    const REFERENCE_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generated_phrase_round_trips() {
        let phrase = generate_phrase(PhraseStrength::Words12).expect("generation failed");
        assert_eq!(phrase.split_whitespace().count(), 12);
        validate_phrase(&phrase).expect("generated phrase must validate");
    }

    #[test]
    fn test_strength_controls_word_count() {
        let phrase = generate_phrase(PhraseStrength::Words24).expect("generation failed");
        assert_eq!(phrase.split_whitespace().count(), 24);
    }

    #[test]
    fn test_two_generated_phrases_differ() {
        let a = generate_phrase(PhraseStrength::Words12).unwrap();
        let b = generate_phrase(PhraseStrength::Words12).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_known_phrase() {
        validate_phrase(TEST_MNEMONIC).expect("known-good phrase must validate");
    }

    #[test]
    fn test_validate_rejects_bad_checksum() {
        // Last word swapped for another wordlist word, breaking the checksum.
        let phrase = "abandon amount liar amount expire adjust cage candy arch gather drum abandon";
        assert!(matches!(
            validate_phrase(phrase),
            Err(KeyError::InvalidChecksum)
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_word() {
        let phrase = "abandon amount liar amount expire adjust cage candy arch gather drum zzzzz";
        assert!(matches!(
            validate_phrase(phrase),
            Err(KeyError::InvalidWordlist)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_word_count() {
        assert!(matches!(
            validate_phrase("abandon amount liar"),
            Err(KeyError::InvalidWordlist)
        ));
    }

    #[test]
    fn test_seed_derivation_is_deterministic() {
        let seed1 = derive_seed(TEST_MNEMONIC, "").unwrap();
        let seed2 = derive_seed(TEST_MNEMONIC, "").unwrap();
        assert_eq!(seed1, seed2, "same phrase must produce same seed");

        let salted = derive_seed(TEST_MNEMONIC, "passphrase").unwrap();
        assert_ne!(seed1, salted, "passphrase must change the seed");
    }

    #[test]
    fn test_seed_matches_reference_vector() {
        let seed = derive_seed(REFERENCE_MNEMONIC, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }
}
