//! Length-prefixed primitives from the OER subset used on the wire.
//!
//! Two primitives cover everything the condition formats need:
//!
//! ```txt
//! length determinant:  nn                    (single byte, n < 128)
//!                      1kkkkkkk b[0] .. b[k-1]  (big-endian length, k bytes)
//! var octet string:    <length determinant> <octets>
//! var uint:            <var octet string of the minimal big-endian value>
//! ```
//!
//! A varuint value body is always at least one byte, so zero goes on the
//! wire as `01 00`.  A zero-length body is still accepted as zero when
//! reading.

use crate::errors::CodecError;
use crate::types::{Codec, Decoder, Encoder};

/// Widest length determinant body we accept, enough for 4 GiB frames.
const MAX_LENGTH_OF_LENGTH: usize = 4;

/// Widest varuint body we can represent.
const MAX_VARUINT_BODY: usize = 8;

/// Returns the minimal big-endian byte length of a value, at least 1.
fn be_len(value: u64) -> usize {
    let bits = u64::BITS - value.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

/// Writes a length determinant.
pub fn write_length_determinant(enc: &mut impl Encoder, len: usize) -> Result<(), CodecError> {
    if len < 128 {
        return (len as u8).encode(enc);
    }

    let body_len = be_len(len as u64);
    (0x80 | body_len as u8).encode(enc)?;
    enc.write_buf(&(len as u64).to_be_bytes()[8 - body_len..])
}

/// Reads a length determinant.
///
/// The indefinite form (`0x80`) and bodies wider than
/// [`MAX_LENGTH_OF_LENGTH`] are rejected.
pub fn read_length_determinant(dec: &mut impl Decoder) -> Result<usize, CodecError> {
    let prefix = u8::decode(dec)?;
    if prefix < 0x80 {
        return Ok(prefix as usize);
    }

    let body_len = (prefix & 0x7f) as usize;
    if body_len == 0 || body_len > MAX_LENGTH_OF_LENGTH {
        return Err(CodecError::InvalidLength);
    }

    let mut len = 0usize;
    for _ in 0..body_len {
        len = (len << 8) | u8::decode(dec)? as usize;
    }

    Ok(len)
}

/// Writes a length-prefixed octet string.
pub fn write_var_octet_string(enc: &mut impl Encoder, bytes: &[u8]) -> Result<(), CodecError> {
    write_length_determinant(enc, bytes.len())?;
    enc.write_buf(bytes)
}

/// Reads a length-prefixed octet string, checking the length against the
/// remaining input before allocating.
pub fn read_var_octet_string(dec: &mut impl Decoder) -> Result<Vec<u8>, CodecError> {
    let len = read_length_determinant(dec)?;
    if len > dec.remaining() {
        return Err(CodecError::OverrunInput);
    }

    let mut buf = vec![0; len];
    dec.read_buf(&mut buf)?;
    Ok(buf)
}

/// Writes an unsigned integer as a length-prefixed minimal big-endian body.
pub fn write_var_uint(enc: &mut impl Encoder, value: u64) -> Result<(), CodecError> {
    let body_len = be_len(value);
    (body_len as u8).encode(enc)?;
    enc.write_buf(&value.to_be_bytes()[8 - body_len..])
}

/// Reads a length-prefixed unsigned integer.
///
/// The prefix must be the single-byte length form; a top bit set there or a
/// body wider than a `u64` is an error.
pub fn read_var_uint(dec: &mut impl Decoder) -> Result<u64, CodecError> {
    let prefix = u8::decode(dec)?;
    if prefix & 0x80 != 0 {
        return Err(CodecError::InvalidVarUInt);
    }

    let body_len = prefix as usize;
    if body_len > MAX_VARUINT_BODY {
        return Err(CodecError::InvalidVarUInt);
    }

    let mut value = 0u64;
    for _ in 0..body_len {
        value = (value << 8) | u8::decode(dec)? as u64;
    }

    Ok(value)
}

/// Encoded size of a length determinant for a given length.
pub fn length_determinant_len(len: usize) -> usize {
    if len < 128 {
        1
    } else {
        1 + be_len(len as u64)
    }
}

/// Encoded size of a var octet string with the given content length.
pub fn var_octet_string_len(len: usize) -> usize {
    length_determinant_len(len) + len
}

/// Encoded size of a varuint for a given value.
pub fn var_uint_len(value: u64) -> usize {
    1 + be_len(value)
}
