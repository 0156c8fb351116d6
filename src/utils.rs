use std::path::{Path, PathBuf};

/// Suffixes we recognize as gzip input names.
const GZIP_SUFFIXES: &[&str] = &["gz", "gzip", "z"];

/// Pick the default output path for a decompressed file: the filename stored
/// in the member header when there is one (base name only, placed next to
/// the input), otherwise the input path with its gzip suffix stripped.
pub fn output_path_for(input: &Path, stored_name: Option<&str>) -> Option<PathBuf> {
    if let Some(name) = stored_name {
        // Only the file name component counts; a stored path must not be
        // able to direct output into another directory.
        if let Some(base) = Path::new(name).file_name() {
            return Some(input.with_file_name(base));
        }
    }
    strip_gzip_suffix(input)
}

/// `foo.txt.gz` -> `foo.txt`; `None` when the name carries no known suffix.
pub fn strip_gzip_suffix(path: &Path) -> Option<PathBuf> {
    let ext = path.extension()?.to_str()?;
    if GZIP_SUFFIXES.contains(&ext.to_lowercase().as_str()) {
        let mut result = path.to_path_buf();
        result.set_extension("");
        Some(result)
    } else {
        None
    }
}

pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = size as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} {}", size, UNITS[unit])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Space saved by compression, as gzip reports it: `1 - compressed/original`.
pub fn format_ratio(compressed: u64, original: u64) -> String {
    if original == 0 {
        "N/A".to_string()
    } else {
        let saved = 100.0 * (1.0 - compressed as f64 / original as f64);
        format!("{:.1}%", saved)
    }
}
