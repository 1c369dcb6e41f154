use std::path::{Component, Path, PathBuf};

/// Find the project root by walking up from `cwd` looking for `package.json`.
///
/// Returns the first directory containing the marker, or `None` if none is found.
#[must_use]
pub fn project_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if current.join("package.json").is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolve `input` against `base` and normalize it.
///
/// Existing directories are canonicalized (without UNC prefixes on Windows);
/// anything else is normalized lexically so `.` and `..` still collapse.
#[must_use]
pub fn resolve_dir(base: &Path, input: &Path) -> PathBuf {
    let joined = if input.is_absolute() {
        input.to_path_buf()
    } else {
        base.join(input)
    };

    dunce::canonicalize(&joined).unwrap_or_else(|_| normalize_lexically(&joined))
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
