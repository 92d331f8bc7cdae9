use thiserror::Error;

/// Errors from ccond-codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// If we tried to read past the end of the underlying buffer.
    #[error("would overrun end of input")]
    OverrunInput,

    /// If there was extra data in a buffer that we didn't consume reading a
    /// message.
    #[error("extra unnecessary input leftover")]
    ExtraInput,

    /// If a length determinant was malformed or wider than the supported
    /// range.
    #[error("malformed length prefix")]
    InvalidLength,

    /// If a varuint prefix byte had its top bit set or the value body was
    /// wider than we can represent.
    #[error("malformed varuint")]
    InvalidVarUInt,
}
