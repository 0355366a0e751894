//! Icon resolution for map entries
//!
//! An icon token is either `path:<template>` with `{theme}` standing for
//! `light`/`dark`, or a bare asset name looked up as `<name>.svg` in the
//! host's themed asset directories.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Prefix marking an explicit icon path template
pub const PATH_PREFIX: &str = "path:";

/// Placeholder substituted with the theme name in path templates
pub const THEME_PLACEHOLDER: &str = "{theme}";

/// Light and dark asset directories supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconThemes {
    pub light_dir: PathBuf,
    pub dark_dir: PathBuf,
}

impl IconThemes {
    pub fn new(light_dir: impl Into<PathBuf>, dark_dir: impl Into<PathBuf>) -> Self {
        Self {
            light_dir: light_dir.into(),
            dark_dir: dark_dir.into(),
        }
    }

    /// `<resources>/light` and `<resources>/dark`
    pub fn under(resources: &Path) -> Self {
        Self::new(resources.join("light"), resources.join("dark"))
    }
}

/// Resolved icon of a map entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IconRef {
    /// Named asset from the themed directories
    Asset {
        name: String,
        light: PathBuf,
        dark: PathBuf,
    },
    /// Explicit path pair from a `path:` template
    Path { light: PathBuf, dark: PathBuf },
}

impl IconRef {
    pub fn resolve(icon: &str, themes: &IconThemes) -> Self {
        if let Some(template) = icon.strip_prefix(PATH_PREFIX) {
            return IconRef::Path {
                light: PathBuf::from(template.replace(THEME_PLACEHOLDER, "light")),
                dark: PathBuf::from(template.replace(THEME_PLACEHOLDER, "dark")),
            };
        }

        let file_name = format!("{icon}.svg");
        IconRef::Asset {
            name: icon.to_string(),
            light: themes.light_dir.join(&file_name),
            dark: themes.dark_dir.join(&file_name),
        }
    }

    pub fn light(&self) -> &Path {
        match self {
            IconRef::Asset { light, .. } | IconRef::Path { light, .. } => light,
        }
    }

    pub fn dark(&self) -> &Path {
        match self {
            IconRef::Asset { dark, .. } | IconRef::Path { dark, .. } => dark,
        }
    }
}
