//! Response body decoding: UTF-8 with a Latin-1 fallback.
//!
//! The listing pages are served as UTF-8, but older review pages still come
//! back in a Windows-1252 variant. Latin-1 decoding cannot fail (every byte
//! maps to a scalar value), so decoding as a whole is infallible.

pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}
