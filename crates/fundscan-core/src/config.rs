use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pkg::npmrc::NpmrcConfig;
use crate::render::Charset;

/// Runtime configuration for the fundscan CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Emit structured JSON instead of the human tree.
    pub json: bool,

    /// Draw trees with Unicode box-drawing characters.
    pub unicode: bool,

    /// Command used to open funding URLs. `None` prints the URL instead.
    pub browser: Option<String>,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json: false,
            unicode: true,
            browser: None,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Layer `.npmrc` values on top of the defaults.
    ///
    /// Only keys present in the file are applied.
    #[must_use]
    pub fn with_npmrc(mut self, npmrc: &NpmrcConfig) -> Self {
        if let Some(json) = npmrc.json {
            self.json = json;
        }
        if let Some(unicode) = npmrc.unicode {
            self.unicode = unicode;
        }
        if npmrc.browser_disabled {
            self.browser = None;
        } else if let Some(ref browser) = npmrc.browser {
            self.browser = Some(browser.clone());
        }
        self
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Set Unicode tree drawing.
    #[must_use]
    pub fn with_unicode(mut self, unicode: bool) -> Self {
        self.unicode = unicode;
        self
    }

    /// Set the browser command.
    #[must_use]
    pub fn with_browser(mut self, browser: Option<String>) -> Self {
        self.browser = browser;
        self
    }

    /// Connector set for human output.
    #[must_use]
    pub fn charset(&self) -> Charset {
        if self.unicode {
            Charset::Unicode
        } else {
            Charset::Ascii
        }
    }
}
