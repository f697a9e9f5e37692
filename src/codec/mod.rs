//! UUID binary codec.
//!
//! Foreign keys such as `Order.customerId` and `Product._id` are stored as
//! 16-byte BSON binaries with subtype 4, while callers hold them as canonical
//! UUID strings. A string never compares equal to a binary, so every lookup
//! encodes the string first and compares bytes and subtype.
//!
//! The encoding must match the driver's native UUID representation exactly;
//! a mismatch does not error, it just matches nothing.

use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::Binary;

/// Length of a UUID in raw bytes.
pub const UUID_BYTES: usize = 16;

/// Length of a UUID in hex digits once hyphens are removed.
const UUID_HEX_DIGITS: usize = UUID_BYTES * 2;

/// Errors from encoding or decoding UUID binaries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid UUID format: {input:?}")]
    InvalidUuidFormat { input: String },

    #[error("Invalid UUID binary length: expected 16 bytes, got {len}")]
    InvalidBinaryLength { len: usize },
}

/// Encode a UUID string as a subtype-4 binary.
///
/// Hyphens are stripped and the remaining 32 hex digits become the 16 raw
/// bytes, in order. Upper and lower case digits are both accepted.
pub fn encode(uuid: &str) -> Result<Binary, CodecError> {
    let hex_digits: String = uuid.chars().filter(|c| *c != '-').collect();
    if hex_digits.len() != UUID_HEX_DIGITS {
        return Err(CodecError::InvalidUuidFormat {
            input: uuid.to_string(),
        });
    }

    let bytes = hex::decode(&hex_digits).map_err(|_| CodecError::InvalidUuidFormat {
        input: uuid.to_string(),
    })?;

    Ok(Binary {
        subtype: BinarySubtype::Uuid,
        bytes,
    })
}

/// Decode a binary back to the lowercase hyphenated UUID form.
///
/// Only the length is checked; the subtype is not.
pub fn decode(bin: &Binary) -> Result<String, CodecError> {
    let bytes: [u8; UUID_BYTES] =
        bin.bytes
            .as_slice()
            .try_into()
            .map_err(|_| CodecError::InvalidBinaryLength {
                len: bin.bytes.len(),
            })?;

    Ok(uuid::Uuid::from_bytes(bytes).hyphenated().to_string())
}

/// Codec equality: does `uuid` identify the same record as the stored `bin`?
///
/// Never fails. A string that cannot be encoded matches nothing.
pub fn equals(uuid: &str, bin: &Binary) -> bool {
    match encode(uuid) {
        Ok(encoded) => encoded.subtype == bin.subtype && encoded.bytes == bin.bytes,
        Err(_) => false,
    }
}
