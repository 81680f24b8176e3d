use std::fmt;
use std::fs;
use std::path::PathBuf;

use image::ImageFormat;
use log::info;

use crate::config::{Config, ICON_SIZES};
use crate::font::LabelFont;
use crate::render::render_with;

#[derive(Debug)]
pub enum IconError {
    /// The image library was built without an encoder for `format`.
    MissingEncoder { format: ImageFormat },
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl IconError {
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            IconError::MissingEncoder { .. } => {
                Some("Enable it with: image = { version = \"0.25\", features = [\"png\"] }")
            }
            _ => None,
        }
    }
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::MissingEncoder { format } => {
                write!(f, "The image library has no {format:?} encoder available")
            }
            IconError::CreateDir { path, .. } => {
                write!(f, "Failed to create output directory {}", path.display())
            }
            IconError::Save { path, .. } => write!(f, "Failed to save icon {}", path.display()),
        }
    }
}

impl std::error::Error for IconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IconError::MissingEncoder { .. } => None,
            IconError::CreateDir { source, .. } => Some(source),
            IconError::Save { source, .. } => Some(source),
        }
    }
}

pub fn ensure_encoder(format: ImageFormat) -> Result<(), IconError> {
    if format.writing_enabled() {
        Ok(())
    } else {
        Err(IconError::MissingEncoder { format })
    }
}

pub struct IconGenerator {
    config: Config,
    font: LabelFont,
    format: ImageFormat,
}

impl IconGenerator {
    /// Resolves the label font from the config and system candidates.
    pub fn new(config: Config) -> Self {
        let font = LabelFont::resolve(config.font_override.as_deref());
        Self::with_font(config, font)
    }

    pub fn with_font(config: Config, font: LabelFont) -> Self {
        Self {
            config,
            font,
            format: ImageFormat::Png,
        }
    }

    /// Writes `icon-<size>.png` for every size, overwriting existing files.
    /// Returns the written paths in size order.
    pub fn run(&mut self) -> Result<Vec<PathBuf>, IconError> {
        ensure_encoder(self.format)?;

        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|source| IconError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;
        info!("Output directory: {}", output_dir.display());
        info!("Label font: {}", self.font.describe());

        println!("[*] Generating app icons...");

        let mut written = Vec::with_capacity(ICON_SIZES.len());
        for size in ICON_SIZES {
            println!("   [*] Generating {size}x{size} icon...");
            let icon = render_with(size, &mut self.font);

            let path = self.config.icon_path(size);
            icon.save_with_format(&path, self.format)
                .map_err(|source| IconError::Save {
                    path: path.clone(),
                    source,
                })?;
            println!("   [+] Saved: {}", path.display());
            written.push(path);
        }

        println!();
        println!("[+] Icon generation complete!");
        println!("[*] Icons written to: {}", self.config.output_dir.display());

        Ok(written)
    }
}
