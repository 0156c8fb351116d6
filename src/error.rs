use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DegzipError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("corrupt compressed data: {0}")]
    Malformed(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("CRC mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch { stored: u32, computed: u32 },

    #[error("length mismatch: stored {stored}, actual {actual}")]
    SizeMismatch { stored: u32, actual: u32 },
}

impl DegzipError {
    pub fn malformed<T: fmt::Display>(msg: T) -> Self {
        DegzipError::Malformed(msg.to_string())
    }

    pub fn unsupported<T: fmt::Display>(msg: T) -> Self {
        DegzipError::Unsupported(msg.to_string())
    }

    pub fn invalid_argument<T: fmt::Display>(msg: T) -> Self {
        DegzipError::InvalidArgument(msg.to_string())
    }
}

pub type DegzipResult<T> = Result<T, DegzipError>;
