use std::env;

use crate::error::{DegzipError, DegzipResult};

#[derive(Debug, Clone)]
pub struct DegzipArgs {
    pub files: Vec<String>,
    pub stdout: bool,
    pub test: bool,
    pub keep: bool,
    pub force: bool,
    pub quiet: bool,
    pub verbosity: u8,
    pub help: bool,
    pub version: bool,
}

impl Default for DegzipArgs {
    fn default() -> Self {
        DegzipArgs {
            files: Vec::new(),
            stdout: false,
            test: false,
            keep: false,
            force: false,
            quiet: false,
            verbosity: 1,
            help: false,
            version: false,
        }
    }
}

impl DegzipArgs {
    pub fn parse() -> DegzipResult<Self> {
        let mut argv: Vec<String> = env::args().collect();
        argv.remove(0); // program name

        // The GZIP environment variable contributes leading arguments.
        if let Ok(gzip_env) = env::var("GZIP") {
            argv.splice(0..0, split_env_args(&gzip_env));
        }

        Self::parse_from(argv)
    }

    pub fn parse_from(argv: Vec<String>) -> DegzipResult<Self> {
        let mut args = DegzipArgs::default();
        let mut in_options = true;

        for arg in argv {
            if !in_options || !arg.starts_with('-') || arg == "-" {
                args.files.push(arg);
                continue;
            }

            if arg == "--" {
                in_options = false;
                continue;
            }

            if let Some(long) = arg.strip_prefix("--") {
                match long {
                    "help" => args.help = true,
                    "version" => args.version = true,
                    "stdout" | "to-stdout" => args.stdout = true,
                    "test" => args.test = true,
                    "keep" => args.keep = true,
                    "force" => args.force = true,
                    "quiet" | "silent" => {
                        args.quiet = true;
                        args.verbosity = 0;
                    }
                    "verbose" => args.verbosity = 2,
                    _ => {
                        return Err(DegzipError::invalid_argument(format!(
                            "unknown option: {}",
                            arg
                        )))
                    }
                }
                continue;
            }

            for short in arg.chars().skip(1) {
                match short {
                    'h' => args.help = true,
                    'V' => args.version = true,
                    'c' => args.stdout = true,
                    't' => args.test = true,
                    'k' => args.keep = true,
                    'f' => args.force = true,
                    'q' => {
                        args.quiet = true;
                        args.verbosity = 0;
                    }
                    'v' => args.verbosity += 1,
                    _ => {
                        return Err(DegzipError::invalid_argument(format!(
                            "unknown option: -{}",
                            short
                        )))
                    }
                }
            }
        }

        Ok(args)
    }
}

/// Split an environment-variable option string, honoring double quotes.
fn split_env_args(env_str: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in env_str.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> DegzipResult<DegzipArgs> {
        DegzipArgs::parse_from(args.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]).unwrap();
        assert!(args.files.is_empty());
        assert!(!args.stdout);
        assert_eq!(args.verbosity, 1);
    }

    #[test]
    fn test_bundled_short_options() {
        let args = parse(&["-ckv", "in.gz"]).unwrap();
        assert!(args.stdout);
        assert!(args.keep);
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.files, vec!["in.gz"]);
    }

    #[test]
    fn test_long_options() {
        let args = parse(&["--test", "--force", "--quiet", "a.gz", "b.gz"]).unwrap();
        assert!(args.test);
        assert!(args.force);
        assert!(args.quiet);
        assert_eq!(args.verbosity, 0);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_double_dash_stops_option_parsing() {
        let args = parse(&["--", "-weird.gz"]).unwrap();
        assert_eq!(args.files, vec!["-weird.gz"]);
    }

    #[test]
    fn test_bare_dash_is_stdin() {
        let args = parse(&["-"]).unwrap();
        assert_eq!(args.files, vec!["-"]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        assert!(parse(&["-x"]).is_err());
        assert!(parse(&["--nope"]).is_err());
    }

    #[test]
    fn test_split_env_args() {
        assert_eq!(split_env_args("-q -k"), vec!["-q", "-k"]);
        assert_eq!(split_env_args("  -v\t-c "), vec!["-v", "-c"]);
        assert_eq!(split_env_args("\"-k\""), vec!["-k"]);
        assert!(split_env_args("").is_empty());
    }
}
