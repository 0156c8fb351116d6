//! degzip - a streaming gzip decompressor
//!
//! Decompresses RFC 1952 gzip files through a from-scratch RFC 1951
//! DEFLATE inflater: canonical Huffman trees, an LSB-first bit reader, and
//! a 32KB sliding window, with CRC32/ISIZE trailer verification.

use std::process;

mod bits;
mod cli;
mod decompression;
mod error;
mod gzip;
mod huffman;
mod inflate;
mod utils;

#[cfg(test)]
mod test_utils;

use cli::DegzipArgs;
use error::DegzipError;

const VERSION: &str = concat!("degzip ", env!("CARGO_PKG_VERSION"));

fn main() {
    match run() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("degzip: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32, DegzipError> {
    let args = DegzipArgs::parse()?;

    if args.version {
        println!("{}", VERSION);
        return Ok(0);
    }

    if args.help {
        print_help();
        return Ok(0);
    }

    let mut exit_code = 0;

    if args.files.is_empty() {
        exit_code = decompression::decompress_stdin(&args)?;
    } else {
        for file in &args.files {
            match decompression::decompress_file(file, &args) {
                Ok(code) => {
                    if code != 0 {
                        exit_code = code;
                    }
                }
                Err(e) => {
                    eprintln!("degzip: {}: {}", file, e);
                    exit_code = 1;
                }
            }
        }
    }

    Ok(exit_code)
}

fn print_help() {
    println!("Usage: degzip [OPTION]... [FILE]...");
    println!();
    println!("Decompress gzip FILEs. With no FILE, or when FILE is -, read stdin.");
    println!("Output goes to the filename stored in the gzip header when present,");
    println!("otherwise to FILE without its .gz suffix.");
    println!();
    println!("Options:");
    println!("  -c, --stdout     Write to stdout, keep original files");
    println!("  -t, --test       Check file integrity, write nothing");
    println!("  -f, --force      Force overwrite of output file");
    println!("  -k, --keep       Keep original file");
    println!("  -q, --quiet      Suppress output");
    println!("  -v, --verbose    Verbose output");
    println!("  -h, --help       Show this help");
    println!("  -V, --version    Show version");
    println!();
    println!("Examples:");
    println!("  degzip file.txt.gz       Decompress to file.txt");
    println!("  degzip -c file.gz > out  Decompress to stdout");
    println!("  cat file.gz | degzip     Decompress stdin to stdout");
}
