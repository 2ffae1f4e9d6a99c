//! Credential cipher
//!
//! One-shot password obfuscation used by the authentication handshake.
//!
//! The password is PKCS#7-padded and encrypted with AES in CBC mode. The AES
//! variant follows the key length (16 → AES-128, 24 → AES-192, 32 → AES-256)
//! and the IV is the first 16 bytes of the key itself. The ciphertext is sent
//! as standard, padded base64 text.

use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use base64::Engine as _;

use crate::error::{CacheError, Result};

/// AES block size in bytes (also the IV length)
pub const BLOCK_SIZE: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes192CbcEnc = cbc::Encryptor<aes::Aes192>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

/// Encrypt `password` with `key` and return the base64 credential.
///
/// Fails with [`CacheError::InvalidCipherKey`] for any key that is not 16, 24
/// or 32 bytes long; keys are never truncated or padded.
pub fn encrypt_password(password: &str, key: &[u8]) -> Result<String> {
    let ciphertext = encrypt_cbc(password.as_bytes(), key)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(ciphertext))
}

/// AES-CBC encrypt with PKCS#7 padding, IV = key prefix
pub fn encrypt_cbc(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let invalid = || CacheError::InvalidCipherKey { len: key.len() };
    if key.len() < BLOCK_SIZE {
        return Err(invalid());
    }
    let iv = &key[..BLOCK_SIZE];

    let ciphertext = match key.len() {
        16 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        24 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        32 => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(|_| invalid())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        _ => return Err(invalid()),
    };

    Ok(ciphertext)
}
