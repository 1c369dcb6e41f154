//! Package reference parsing.
//!
//! Parses user-supplied references like:
//! - `react`
//! - `react@18.2.0`
//! - `@types/node`
//! - `@types/node@^20`
//! - `.`, `./packages/a`, `/abs/path`, `file:../lib` (local directories)

use std::path::PathBuf;

/// A parsed package reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageRef {
    /// A local directory, relative paths not yet resolved.
    Directory(PathBuf),
    /// A registry-style name with an optional range or tag.
    Name {
        /// Full package name (e.g., "@scope/name" or "name").
        name: String,
        /// Range or tag after the `@`, kept for display only.
        range: Option<String>,
    },
}

impl PackageRef {
    /// Classify and parse a reference. Never fails; anything that is not a
    /// directory is treated as a name.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if let Some(path) = input.strip_prefix("file:") {
            return Self::Directory(PathBuf::from(path));
        }

        if looks_like_path(input) {
            return Self::Directory(PathBuf::from(input));
        }

        let (name, range) = split_name_range(input);
        Self::Name {
            name: name.to_string(),
            range: range.filter(|r| !r.is_empty()).map(String::from),
        }
    }
}

fn looks_like_path(input: &str) -> bool {
    if input == "." || input == ".." {
        return true;
    }
    if input.starts_with("./")
        || input.starts_with("../")
        || input.starts_with('/')
        || input.starts_with("~/")
        || input.starts_with(".\\")
        || input.starts_with("..\\")
    {
        return true;
    }

    // Windows absolute path check
    let bytes = input.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Split `name[@range]`, keeping the leading `@` of scoped names.
fn split_name_range(input: &str) -> (&str, Option<&str>) {
    let search_from = usize::from(input.starts_with('@'));
    match input[search_from..].find('@') {
        Some(pos) => {
            let at = search_from + pos;
            (&input[..at], Some(&input[at + 1..]))
        }
        None => (input, None),
    }
}
