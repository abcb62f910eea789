use serde::{Deserialize, Serialize};

use crate::clock::TimeZoneSetting;
use crate::template::RenderOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

pub const DEFAULT_TIMEZONE: &str = "local";
pub const DEFAULT_FUZZY_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// show a banner in place of blocks whose condition fails
    #[serde(default = "default_show_errors")]
    pub show_errors: bool,
    /// `local`, `utc`, or a fixed offset like `+02:00`
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// max edit distance for "did you mean" hints on invalid names
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: usize,
}

fn default_show_errors() -> bool {
    true
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_fuzzy_threshold() -> usize {
    DEFAULT_FUZZY_THRESHOLD
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_errors: true,
            timezone: default_timezone(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl Settings {
    /// configured timezone, local time when unparseable
    pub fn timezone(&self) -> TimeZoneSetting {
        TimeZoneSetting::from_config(&self.timezone)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_errors: self.show_errors,
        }
    }
}
