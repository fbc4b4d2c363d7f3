use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of a rendered file id: 128 bits as lowercase hex.
pub const FILE_ID_LEN: usize = 32;

/// Generates a new file id from the operating system's RNG.
pub fn generate_file_id() -> Result<String> {
    generate_file_id_with(&mut OsRng)
}

/// Generates a file id from the given randomness source.
///
/// The raw 16 bytes are rendered as-is; no version bits are stamped in, so
/// the id carries the full 128 bits of entropy.
pub fn generate_file_id_with<R: RngCore + ?Sized>(rng: &mut R) -> Result<String> {
    let mut bytes = [0u8; 16];
    rng.try_fill_bytes(&mut bytes).map_err(Error::Generation)?;
    Ok(Uuid::from_bytes(bytes).simple().to_string())
}

/// Returns true if `id` has the shape of a generated file id.
pub fn is_valid_file_id(id: &str) -> bool {
    id.len() == FILE_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
