//! File and stream orchestration around the inflater.
//!
//! Each input is one gzip member: parse the header, stream the DEFLATE body
//! through the inflater into the sink while accumulating a CRC32, then check
//! the trailer against what actually came out. Output goes to the filename
//! stored in the header when there is one, otherwise to the input path with
//! its suffix stripped; `-c` redirects to stdout and `-t` to nowhere.

use std::fs::{self, File};
use std::io::{self, stdin, stdout, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::cli::DegzipArgs;
use crate::error::{DegzipError, DegzipResult};
use crate::gzip::{GzipHeader, GzipTrailer};
use crate::inflate;
use crate::utils::{format_ratio, format_size, output_path_for};

/// Buffer size for file and stdio streams.
const STREAM_BUFFER_SIZE: usize = 256 * 1024;

/// Write adapter that tracks the CRC32 and byte count of everything
/// passing through, for trailer verification.
struct CheckedWriter<W> {
    inner: W,
    hasher: crc32fast::Hasher,
    count: u64,
}

impl<W: Write> CheckedWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            count: 0,
        }
    }

    fn finalize(self) -> (u32, u64) {
        (self.hasher.finalize(), self.count)
    }
}

impl<W: Write> Write for CheckedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Inflate the DEFLATE body into `sink`, then read the trailer and verify
/// CRC32 and ISIZE against the decoded output. Returns the byte count.
fn decode_body<R: Read, W: Write>(source: &mut R, sink: W) -> DegzipResult<u64> {
    let mut checked = CheckedWriter::new(sink);
    inflate::inflate(&mut *source, &mut checked)?;
    checked.flush()?;
    let (computed_crc, count) = checked.finalize();

    let trailer = GzipTrailer::read(source)?;
    if trailer.crc32 != computed_crc {
        return Err(DegzipError::CrcMismatch {
            stored: trailer.crc32,
            computed: computed_crc,
        });
    }
    if trailer.isize != count as u32 {
        return Err(DegzipError::SizeMismatch {
            stored: trailer.isize,
            actual: count as u32,
        });
    }
    Ok(count)
}

/// Decode a single gzip member from `source` into `sink`.
pub fn decompress_stream<R: Read, W: Write>(
    source: &mut R,
    sink: W,
) -> DegzipResult<(GzipHeader, u64)> {
    let header = GzipHeader::read(source)?;
    let count = decode_body(source, sink)?;
    Ok((header, count))
}

pub fn decompress_file(filename: &str, args: &DegzipArgs) -> DegzipResult<i32> {
    if filename == "-" {
        return decompress_stdin(args);
    }

    let input_path = Path::new(filename);
    if input_path.is_dir() {
        return Err(DegzipError::invalid_argument(format!(
            "{} is a directory",
            filename
        )));
    }

    let input_file = File::open(input_path)?;
    let compressed_size = input_file.metadata()?.len();
    let mut reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, input_file);
    let header = GzipHeader::read(&mut reader)?;

    if args.test {
        decode_body(&mut reader, io::sink())?;
        if args.verbosity > 0 && !args.quiet {
            eprintln!("{}: OK", filename);
        }
        return Ok(0);
    }

    if args.stdout {
        let stdout = stdout();
        let mut writer = BufWriter::with_capacity(STREAM_BUFFER_SIZE, stdout.lock());
        decode_body(&mut reader, &mut writer)?;
        writer.flush()?;
        return Ok(0);
    }

    let output_path = output_path_for(input_path, header.name.as_deref()).ok_or_else(|| {
        DegzipError::invalid_argument(format!("{}: unknown suffix and no stored name", filename))
    })?;
    if output_path.exists() && !args.force {
        return Err(DegzipError::invalid_argument(format!(
            "{} already exists; use --force to overwrite",
            output_path.display()
        )));
    }

    let result = File::create(&output_path)
        .map_err(DegzipError::Io)
        .and_then(|output_file| {
            let mut writer = BufWriter::with_capacity(STREAM_BUFFER_SIZE, output_file);
            let count = decode_body(&mut reader, &mut writer)?;
            writer.flush()?;
            Ok(count)
        });

    match result {
        Ok(output_size) => {
            if args.verbosity > 1 {
                eprintln!(
                    "{}: {} ({} -> {}) -- written to {}",
                    filename,
                    format_ratio(compressed_size, output_size),
                    format_size(compressed_size),
                    format_size(output_size),
                    output_path.display()
                );
            }
            if !args.keep {
                fs::remove_file(input_path)?;
            }
            Ok(0)
        }
        Err(e) => {
            // Never leave a truncated or unverified output file behind.
            let _ = fs::remove_file(&output_path);
            Err(e)
        }
    }
}

pub fn decompress_stdin(args: &DegzipArgs) -> DegzipResult<i32> {
    let stdin = stdin();
    let mut reader = BufReader::with_capacity(STREAM_BUFFER_SIZE, stdin.lock());

    if args.test {
        decompress_stream(&mut reader, io::sink())?;
        return Ok(0);
    }

    let stdout = stdout();
    let mut writer = BufWriter::with_capacity(STREAM_BUFFER_SIZE, stdout.lock());
    decompress_stream(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::{Compression, GzBuilder};

    fn gzip_bytes(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_stream_round_trip() {
        let original = b"stream me through the whole pipeline";
        let compressed = gzip_bytes(original);

        let mut output = Vec::new();
        let (_, count) = decompress_stream(&mut &compressed[..], &mut output).unwrap();
        assert_eq!(count, original.len() as u64);
        assert_eq!(output, original);
    }

    #[test]
    fn test_stream_surfaces_stored_filename() {
        let mut encoder = GzBuilder::new()
            .filename("notes.txt")
            .write(Vec::new(), Compression::default());
        encoder.write_all(b"named").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut output = Vec::new();
        let (header, _) = decompress_stream(&mut &compressed[..], &mut output).unwrap();
        assert_eq!(header.name.as_deref(), Some("notes.txt"));
        assert_eq!(output, b"named");
    }

    #[test]
    fn test_corrupted_crc_detected() {
        let mut compressed = gzip_bytes(b"checksummed payload");
        let crc_at = compressed.len() - 8;
        compressed[crc_at] ^= 0xFF;

        let result = decompress_stream(&mut &compressed[..], &mut Vec::new());
        assert!(matches!(result, Err(DegzipError::CrcMismatch { .. })));
    }

    #[test]
    fn test_corrupted_isize_detected() {
        let mut compressed = gzip_bytes(b"sized payload");
        let isize_at = compressed.len() - 4;
        compressed[isize_at] = compressed[isize_at].wrapping_add(1);

        let result = decompress_stream(&mut &compressed[..], &mut Vec::new());
        assert!(matches!(result, Err(DegzipError::SizeMismatch { .. })));
    }

    #[test]
    fn test_truncated_trailer() {
        let compressed = gzip_bytes(b"cut short");
        let truncated = &compressed[..compressed.len() - 3];

        let result = decompress_stream(&mut &truncated[..], &mut Vec::new());
        assert!(matches!(result, Err(DegzipError::UnexpectedEof)));
    }

    #[test]
    fn test_emitted_bytes_stay_on_error() {
        // Fatal trailer errors leave already-decoded bytes in the sink.
        let mut compressed = gzip_bytes(b"partial survivors");
        let crc_at = compressed.len() - 8;
        compressed[crc_at] ^= 0x01;

        let mut output = Vec::new();
        let result = decompress_stream(&mut &compressed[..], &mut output);
        assert!(result.is_err());
        assert_eq!(output, b"partial survivors");
    }
}
