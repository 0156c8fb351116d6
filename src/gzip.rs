//! RFC 1952 envelope parsing.
//!
//! A gzip member is a 10-byte fixed header, optional fields gated by the
//! flags byte, the DEFLATE body, and an 8-byte trailer (CRC32 + ISIZE, both
//! little-endian). The parser consumes exactly the header from the source
//! and leaves it positioned at the first byte of the DEFLATE stream.

use std::io::{self, Read};

use crate::error::{DegzipError, DegzipResult};

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
const METHOD_DEFLATE: u8 = 8;

pub const FTEXT: u8 = 0x01;
pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;

/// Parsed member header. Optional fields are retained: the embedded
/// filename decides the default output path.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct GzipHeader {
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
    pub text: bool,
    pub extra: Option<Vec<u8>>,
    pub name: Option<String>,
    pub comment: Option<String>,
}

impl GzipHeader {
    /// Parse the header, including all flagged optional fields. The header
    /// CRC16, when present, is consumed but not checked. Reserved flag bits
    /// are ignored.
    pub fn read<R: Read>(src: &mut R) -> DegzipResult<Self> {
        let mut fixed = [0u8; 10];
        read_exact(src, &mut fixed)?;

        if fixed[0..2] != GZIP_MAGIC {
            return Err(DegzipError::malformed("not in gzip format"));
        }
        if fixed[2] != METHOD_DEFLATE {
            return Err(DegzipError::unsupported(format!(
                "compression method {}",
                fixed[2]
            )));
        }

        let flags = fixed[3];
        let mut header = GzipHeader {
            mtime: u32::from_le_bytes([fixed[4], fixed[5], fixed[6], fixed[7]]),
            extra_flags: fixed[8],
            os: fixed[9],
            text: flags & FTEXT != 0,
            ..GzipHeader::default()
        };

        if flags & FEXTRA != 0 {
            let mut xlen = [0u8; 2];
            read_exact(src, &mut xlen)?;
            let mut extra = vec![0u8; u16::from_le_bytes(xlen) as usize];
            read_exact(src, &mut extra)?;
            header.extra = Some(extra);
        }

        if flags & FNAME != 0 {
            header.name = Some(read_latin1_string(src)?);
        }

        if flags & FCOMMENT != 0 {
            header.comment = Some(read_latin1_string(src)?);
        }

        if flags & FHCRC != 0 {
            let mut crc16 = [0u8; 2];
            read_exact(src, &mut crc16)?;
        }

        Ok(header)
    }
}

/// The trailer that follows the DEFLATE body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipTrailer {
    /// CRC32 of the uncompressed data.
    pub crc32: u32,
    /// Uncompressed size mod 2^32.
    pub isize: u32,
}

impl GzipTrailer {
    pub fn read<R: Read>(src: &mut R) -> DegzipResult<Self> {
        let mut raw = [0u8; 8];
        read_exact(src, &mut raw)?;
        Ok(Self {
            crc32: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            isize: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
        })
    }
}

fn read_exact<R: Read>(src: &mut R, buf: &mut [u8]) -> DegzipResult<()> {
    match src.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(DegzipError::UnexpectedEof),
        Err(e) => Err(DegzipError::Io(e)),
    }
}

/// NUL-terminated, ISO 8859-1. Each byte maps directly to the Unicode code
/// point of the same value.
fn read_latin1_string<R: Read>(src: &mut R) -> DegzipResult<String> {
    let mut out = String::new();
    loop {
        let mut byte = [0u8; 1];
        read_exact(src, &mut byte)?;
        if byte[0] == 0 {
            return Ok(out);
        }
        out.push(byte[0] as char);
    }
}
