//! Persistence layer for console state.
//!
//! Bindings and variables are stored as flat text files, one `<key> <value>`
//! pair per line. Reading is lenient: lines without a value are skipped so a
//! corrupt file never blocks startup. Writing always rewrites the whole file.
//!
//! With the `ron` feature, console settings can also be loaded from a RON file
//! (see [`ConsoleConfigFile`]).

use std::fs;
use std::path::Path;

#[cfg(feature = "ron")]
mod settings;

#[cfg(feature = "ron")]
pub use settings::{ConsoleConfigFile, DEFAULT_SETTINGS_FILE};

/// Errors that can occur while reading or writing console files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The file could not be read or written.
    Io {
        /// The file involved.
        path: String,
        /// The underlying error.
        message: String,
    },
    /// The file contents could not be parsed.
    Parse {
        /// The file involved.
        path: String,
        /// The underlying error.
        message: String,
    },
    /// The data could not be serialized.
    Serialize(String),
}

impl PersistError {
    pub(crate) fn io(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io { path, message } => write!(f, "IO error for '{}': {}", path, message),
            PersistError::Parse { path, message } => {
                write!(f, "Parse error for '{}': {}", path, message)
            }
            PersistError::Serialize(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {}

/// Split one file line into `(key, value)` on the first whitespace char.
///
/// The value is kept exactly as written, apart from a trailing `\r`.
/// Returns `None` for blank lines and lines with no value.
pub fn parse_pair(line: &str) -> Option<(&str, &str)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let (key, value) = line.split_once(char::is_whitespace)?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Read every `(key, value)` pair from a flat file, in file order.
///
/// Malformed lines are skipped. A missing file is an [`PersistError::Io`];
/// callers that treat "no file yet" as empty should check first.
pub fn read_pairs(path: impl AsRef<Path>) -> Result<Vec<(String, String)>, PersistError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;

    Ok(contents
        .lines()
        .filter_map(parse_pair)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}

/// Overwrite a flat file with the given pairs, one per line.
pub fn write_pairs<'a>(
    path: impl AsRef<Path>,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<(), PersistError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| PersistError::io(parent, e))?;
        }
    }

    let mut contents = String::new();
    for (key, value) in pairs {
        contents.push_str(key);
        contents.push(' ');
        contents.push_str(value);
        contents.push('\n');
    }

    fs::write(path, contents).map_err(|e| PersistError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("f1 noclip"), Some(("f1", "noclip")));
        assert_eq!(
            parse_pair("g tp 5 ~ 10; timescale 2\r"),
            Some(("g", "tp 5 ~ 10; timescale 2"))
        );
        assert_eq!(parse_pair("key   spaced value"), Some(("key", "  spaced value")));
        assert_eq!(parse_pair("lonely"), None);
        assert_eq!(parse_pair(""), None);
        assert_eq!(parse_pair("   "), None);
    }

    #[test]
    fn test_pairs_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("binds.cfg");

        write_pairs(&path, [("f1", "noclip"), ("g", r#"echo "a b"; tp 1 2 3"#)]).unwrap();
        let pairs = read_pairs(&path).unwrap();

        assert_eq!(
            pairs,
            vec![
                ("f1".to_string(), "noclip".to_string()),
                ("g".to_string(), r#"echo "a b"; tp 1 2 3"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"timescale 2\n\nbroken\n  \nfov 90\n").unwrap();
        temp.flush().unwrap();

        let pairs = read_pairs(temp.path()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], ("fov".to_string(), "90".to_string()));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_pairs(dir.path().join("missing.cfg")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
