/*!
Error types.
*/
use thiserror::Error;

use crate::alloc::AllocError;
use crate::config::ConfigError;
use crate::encoding::DetectedEncoding;

/**
Reasons a foreign string could not be turned into text.

Reading the NA sentinel is *not* an error; `Codec::decode` reports it as `Ok(None)`.
*/
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("null string handle")]
    NullHandle,
    #[error("no zero terminator within {limit} bytes")]
    Unterminated { limit: usize },
    #[error("malformed {encoding} input{}", at_suffix(.valid_up_to))]
    Malformed {
        encoding: DetectedEncoding,
        /// Byte offset of the first bad byte, where the decoder can tell.
        valid_up_to: Option<usize>,
    },
}

fn at_suffix(valid_up_to: &Option<usize>) -> String {
    match *valid_up_to {
        Some(at) => format!(" after byte {}", at),
        None => String::new(),
    }
}

/**
Any error this crate can produce.
*/
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            DecodeError::Unterminated { limit: 16 }.to_string(),
            "no zero terminator within 16 bytes"
        );
        assert_eq!(
            DecodeError::Malformed { encoding: DetectedEncoding::Utf8, valid_up_to: Some(3) }.to_string(),
            "malformed UTF-8 input after byte 3"
        );
        assert_eq!(
            DecodeError::Malformed { encoding: DetectedEncoding::SystemDefault, valid_up_to: None }.to_string(),
            "malformed system default input"
        );
        assert_eq!(Error::from(AllocError::Failed).to_string(), "failed to allocate memory");
    }
}
