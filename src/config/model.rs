//! Config struct definition and default implementation.

use serde::{Deserialize, Serialize};

/// Configuration for header parsing.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Leading path components dropped from git-dialect names (the `a/` and
    /// `b/` prefixes). Equivalent to `git apply -p`.
    #[serde(default = "default_strip_components")]
    pub strip_components: usize,

    /// Treat an epoch timestamp on a traditional `---`/`+++` line as "this
    /// side did not exist".
    #[serde(default = "default_true")]
    pub epoch_timestamps: bool,
}

fn default_strip_components() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip_components: default_strip_components(),
            epoch_timestamps: default_true(),
        }
    }
}
