//! NetEase "eapi" request signing and payload encryption.
//!
//! Request bodies are `params=<HEX>` where HEX is the upper-case
//! AES-128-ECB/PKCS7 ciphertext of `path-SALT-json-SALT-md5`. Responses are
//! either plain JSON or ciphertext under the same key.

use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};

use space_core::error::AppError;
use space_core::result::AppResult;

const EAPI_KEY: [u8; 16] = *b"e82ckenh8dichen8";
const EAPI_SALT: &str = "36cd479b6b5";

type Encryptor = ecb::Encryptor<Aes128>;
type Decryptor = ecb::Decryptor<Aes128>;

/// Build the form body for an eapi call to `path` carrying `payload`.
pub fn encrypt_params(path: &str, payload: &str) -> String {
    let digest = md5::compute(format!("nobody{path}use{payload}md5forencrypt"));
    let plaintext = format!("{path}-{EAPI_SALT}-{payload}-{EAPI_SALT}-{digest:x}");

    let ciphertext =
        Encryptor::new(&EAPI_KEY.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    format!("params={}", hex::encode_upper(ciphertext))
}

/// Decrypt an encrypted eapi response body.
pub fn decrypt_body(body: &[u8]) -> AppResult<Vec<u8>> {
    Decryptor::new(&EAPI_KEY.into())
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|e| AppError::upstream(format!("Failed to decrypt upstream payload: {e}")))
}

/// Parse a response body that may be plain JSON or eapi ciphertext.
pub fn decode_body(body: &[u8]) -> AppResult<serde_json::Value> {
    if let Ok(text) = std::str::from_utf8(body) {
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(json) = serde_json::from_str(trimmed) {
                return Ok(json);
            }
        }
    }

    let plaintext = decrypt_body(body)?;
    serde_json::from_slice(&plaintext)
        .map_err(|e| AppError::upstream(format!("Malformed upstream payload: {e}")))
}
