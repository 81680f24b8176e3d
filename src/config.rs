use std::path::{Path, PathBuf};

use image::Rgb;

/// 图标上绘制的产品名
pub const LABEL: &str = "一起飞";

/// Brand purple, `#9333EA`.
pub const BRAND_COLOR: Rgb<u8> = Rgb([0x93, 0x33, 0xEA]);
pub const LABEL_COLOR: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);
pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0xFF, 0xFF, 0xFF]);

/// Sizes written on every run, in order.
pub const ICON_SIZES: [u32; 2] = [192, 512];

/// Icons at least this large get the circular outline.
pub const OUTLINE_MIN_SIZE: u32 = 256;

pub const OUTPUT_DIR_VAR: &str = "ICONFORGE_OUTPUT_DIR";
pub const FONT_VAR: &str = "ICONFORGE_FONT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub output_dir: PathBuf,
    /// Font file tried before the system candidates.
    pub font_override: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            font_override: None,
        }
    }
}

impl Config {
    /// Reads overrides from the process environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should be honored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            output_dir: non_empty(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(Self::default_output_dir),
            font_override: non_empty(FONT_VAR).map(PathBuf::from),
        }
    }

    /// `<repo_root>/public`
    pub fn default_output_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn icon_path(&self, size: u32) -> PathBuf {
        self.output_dir.join(format!("icon-{size}.png"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_point_at_public_dir() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert!(config.output_dir.ends_with("public"));
        assert!(config.font_override.is_none());
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (OUTPUT_DIR_VAR, "/tmp/icons"),
            (FONT_VAR, "/fonts/custom.ttf"),
        ]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/icons"));
        assert_eq!(config.font_override, Some(PathBuf::from("/fonts/custom.ttf")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = Config::from_lookup(lookup(&[(OUTPUT_DIR_VAR, "  "), (FONT_VAR, "")]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn icon_path_uses_size_in_file_name() {
        let config = Config::default().with_output_dir("out");
        assert_eq!(config.icon_path(192), PathBuf::from("out").join("icon-192.png"));
        assert_eq!(config.icon_path(512), PathBuf::from("out").join("icon-512.png"));
    }
}
