//! Special purpose binary encoding framework for the OER subset that
//! crypto-conditions use on the wire.

mod buf_decoder;
mod errors;
mod hasher;
mod oer;
mod predictor;
mod types;
mod util;

pub use buf_decoder::BufDecoder;
pub use errors::CodecError;
pub use hasher::Sha256Hasher;
pub use oer::{
    length_determinant_len, read_length_determinant, read_var_octet_string, read_var_uint,
    var_octet_string_len, var_uint_len, write_length_determinant, write_var_octet_string,
    write_var_uint,
};
pub use predictor::Predictor;
pub use types::{Codec, Decoder, Encoder};
pub use util::{decode_buf_exact, encode_to_vec};
