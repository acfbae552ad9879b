//! Password-gated sealing of key material using ChaCha20-Poly1305
//!
//! The sealing key is derived with HKDF-HMAC-SHA256 from the password and
//! a random per-file salt. Poly1305 authentication means a wrong password
//! surfaces as a decryption failure, never as garbage plaintext.

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::Hkdf;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::KeystoreError;

const KDF_NAME: &str = "hkdf-sha256";
const HKDF_INFO: &[u8] = b"wisp-keyfile";
const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Sealed key material as it appears inside a key file, all binary fields
/// hex-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedBlob {
    pub ciphertext: String,
    pub nonce: String,
    pub salt: String,
    pub kdf: String,
}

/// Seal `plaintext` under `password` with a fresh salt and nonce.
pub fn seal(password: &str, plaintext: &[u8]) -> Result<SealedBlob, KeystoreError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt)?;

    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
    let cipher = ChaCha20Poly1305::new(&key);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| KeystoreError::Encryption)?;

    Ok(SealedBlob {
        ciphertext: hex::encode(ciphertext),
        nonce: hex::encode(nonce),
        salt: hex::encode(salt),
        kdf: KDF_NAME.to_string(),
    })
}

/// Open a sealed blob with `password`. An authentication failure is
/// exactly a wrong password (or a tampered file, which is reported the
/// same way).
pub fn open(blob: &SealedBlob, password: &str) -> Result<Vec<u8>, KeystoreError> {
    if blob.kdf != KDF_NAME {
        return Err(KeystoreError::UnsupportedKdf {
            kdf: blob.kdf.clone(),
        });
    }

    let salt = hex::decode(&blob.salt).map_err(|_| KeystoreError::MalformedBlob)?;
    let nonce_bytes = hex::decode(&blob.nonce).map_err(|_| KeystoreError::MalformedBlob)?;
    let nonce_array: [u8; NONCE_LEN] = nonce_bytes
        .try_into()
        .map_err(|_| KeystoreError::MalformedBlob)?;
    let ciphertext = hex::decode(&blob.ciphertext).map_err(|_| KeystoreError::MalformedBlob)?;

    let key = derive_key(password, &salt)?;
    let cipher = ChaCha20Poly1305::new(&key);
    cipher
        .decrypt(&Nonce::from(nonce_array), ciphertext.as_ref())
        .map_err(|_| KeystoreError::WrongPassword)
}

fn derive_key(password: &str, salt: &[u8]) -> Result<Key, KeystoreError> {
    let hk = Hkdf::<Sha256>::new(Some(salt), password.as_bytes());
    let mut key_bytes = [0u8; 32];
    hk.expand(HKDF_INFO, &mut key_bytes)
        .map_err(|_| KeystoreError::KeyDerivation)?;
    Ok(Key::from(key_bytes))
}
