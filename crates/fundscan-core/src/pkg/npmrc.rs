//! `.npmrc` file parser for display settings.
//!
//! Parses `.npmrc` files to extract the keys fundscan honours:
//! - `unicode=true|false` for tree connectors
//! - `browser=<cmd>` (or `browser=false`) for opening funding URLs
//! - `json=true|false` for default output mode
//! - `${ENV_VAR}` expansion in values

use std::path::Path;

/// Parsed `.npmrc` configuration. Unset keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpmrcConfig {
    pub unicode: Option<bool>,
    pub browser: Option<String>,
    /// Set by `browser=false`.
    pub browser_disabled: bool,
    pub json: Option<bool>,
}

/// Parse a single `.npmrc` file's content.
///
/// Ignores comments (`#`, `;`), blank lines and unknown keys.
#[must_use]
pub fn parse_npmrc(content: &str) -> NpmrcConfig {
    let mut config = NpmrcConfig::default();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = expand_env_vars(value.trim());

        match key.trim() {
            "unicode" => config.unicode = parse_bool(&value),
            "json" => config.json = parse_bool(&value),
            "browser" => match parse_bool(&value) {
                Some(false) => {
                    config.browser = None;
                    config.browser_disabled = true;
                }
                Some(true) => {}
                None if !value.is_empty() => config.browser = Some(value),
                None => {}
            },
            _ => {}
        }
    }

    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Load and merge `.npmrc` files from project directory up to home.
///
/// Priority order (first wins, no overwrite):
/// 1. `project_dir/.npmrc`
/// 2. Parent directories up to filesystem root
/// 3. `$HOME/.npmrc`
#[must_use]
pub fn load_npmrc_files(project_dir: &Path) -> NpmrcConfig {
    let mut merged = NpmrcConfig::default();

    let mut dir = Some(project_dir.to_path_buf());
    while let Some(d) = dir {
        merge_file(&mut merged, &d.join(".npmrc"));
        dir = d.parent().map(Path::to_path_buf);
    }

    // The walk misses $HOME when the project lives outside it
    if let Some(home) = dirs_next::home_dir() {
        merge_file(&mut merged, &home.join(".npmrc"));
    }

    merged
}

fn merge_file(target: &mut NpmrcConfig, path: &Path) {
    if !path.is_file() {
        return;
    }
    if let Ok(content) = std::fs::read_to_string(path) {
        merge_config(target, &parse_npmrc(&content));
    }
}

/// Merge `source` into `target`, keeping existing entries (first wins).
fn merge_config(target: &mut NpmrcConfig, source: &NpmrcConfig) {
    if target.unicode.is_none() {
        target.unicode = source.unicode;
    }
    if target.json.is_none() {
        target.json = source.json;
    }
    if target.browser.is_none() && !target.browser_disabled {
        target.browser.clone_from(&source.browser);
        target.browser_disabled = source.browser_disabled;
    }
}

/// Expand `${ENV_VAR}` patterns in a string.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
            // Missing variables expand to the empty string
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
