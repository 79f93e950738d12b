use std::{env, path::PathBuf};

/// Where and how a map worker writes its intermediate files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// The directory holding the `mrtmp.*` intermediate files
    pub output_dir: PathBuf,
    /// Also `fsync` every intermediate file once it is complete
    pub sync_outputs: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            sync_outputs: false,
        }
    }
}

impl MapConfig {
    /// Build the configuration from `MR_OUTPUT_DIR` and `MR_SYNC_OUTPUTS`,
    /// falling back to the defaults for anything unset or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            output_dir: lookup("MR_OUTPUT_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            sync_outputs: lookup("MR_SYNC_OUTPUTS")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(default.sync_outputs),
        }
    }

    /// Apply settings given explicitly, e.g. on the command line, over this configuration
    pub fn with_overrides(self, output_dir: Option<PathBuf>, sync_outputs: Option<bool>) -> Self {
        Self {
            output_dir: output_dir.unwrap_or(self.output_dir),
            sync_outputs: sync_outputs.unwrap_or(self.sync_outputs),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
