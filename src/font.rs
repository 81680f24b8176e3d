use std::fmt;
use std::path::{Path, PathBuf};

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, fontdb};
use log::{debug, info};

const FONT_LOCALE: &str = "zh-CN";
const LINE_HEIGHT_FACTOR: f32 = 1.2;
// cosmic-text 不接受 0 行高
const MIN_OUTLINE_SIZE: f32 = 1.0;

// 内置字体: 每个字符画成一个固定大小的空心方框
const BUILTIN_ADVANCE: i32 = 6;
const BUILTIN_BOX_WIDTH: u32 = 5;
const BUILTIN_BOX_HEIGHT: u32 = 10;

#[derive(Debug)]
pub enum FontError {
    NotFound(PathBuf),
    ReadError(PathBuf, std::io::Error),
    NoFace(PathBuf),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::NotFound(path) => write!(f, "Font file not found: {}", path.display()),
            FontError::ReadError(path, err) => {
                write!(f, "Failed to read font file {}: {err}", path.display())
            }
            FontError::NoFace(path) => write!(f, "No usable font face in {}", path.display()),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::ReadError(_, err) => Some(err),
            _ => None,
        }
    }
}

/// A rectangle of uniform glyph coverage, in pixels relative to the text origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub alpha: u8,
}

/// A scalable font loaded from a single file.
pub struct OutlineFont {
    path: PathBuf,
    family: String,
    font_system: FontSystem,
    swash: SwashCache,
}

impl OutlineFont {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        if !path.is_file() {
            return Err(FontError::NotFound(path.to_path_buf()));
        }

        let mut db = fontdb::Database::new();
        db.load_font_file(path)
            .map_err(|err| FontError::ReadError(path.to_path_buf(), err))?;

        let family = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| FontError::NoFace(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            family,
            font_system: FontSystem::new_with_locale_and_db(FONT_LOCALE.to_string(), db),
            swash: SwashCache::new(),
        })
    }

    fn rasterize(&mut self, text: &str, font_size: f32) -> Vec<Coverage> {
        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(Family::Name(&self.family));
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut coverage = Vec::new();
        buffer.draw(
            &mut self.font_system,
            &mut self.swash,
            Color::rgb(0xFF, 0xFF, 0xFF),
            |x, y, width, height, color| {
                if color.a() > 0 {
                    coverage.push(Coverage {
                        x,
                        y,
                        width,
                        height,
                        alpha: color.a(),
                    });
                }
            },
        );
        coverage
    }
}

/// The font used for the icon label, picked once by [`LabelFont::resolve`].
pub enum LabelFont {
    Outline(Box<OutlineFont>),
    /// Always available. Ignores the requested size.
    Builtin,
}

impl fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFont::Outline(font) => f
                .debug_struct("Outline")
                .field("family", &font.family)
                .field("path", &font.path)
                .finish(),
            LabelFont::Builtin => f.write_str("Builtin"),
        }
    }
}

impl LabelFont {
    /// Walks [`candidate_paths`] in order and returns the first font that
    /// loads, or the built-in font. Never fails.
    pub fn resolve(font_override: Option<&Path>) -> Self {
        Self::resolve_from(candidate_paths(font_override))
    }

    pub fn resolve_from(candidates: impl IntoIterator<Item = PathBuf>) -> Self {
        for path in candidates {
            match OutlineFont::load(&path) {
                Ok(font) => {
                    info!("Using font \"{}\" from {}", font.family, path.display());
                    return LabelFont::Outline(Box::new(font));
                }
                Err(err) => debug!("Skipping font candidate: {err}"),
            }
        }

        info!("No system font could be loaded, using the built-in font");
        LabelFont::Builtin
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, LabelFont::Builtin)
    }

    pub fn describe(&self) -> String {
        match self {
            LabelFont::Outline(font) => format!("{} ({})", font.family, font.path.display()),
            LabelFont::Builtin => "built-in".to_string(),
        }
    }

    /// Rasterizes `text` at `font_size` pixels. Coordinates are relative to
    /// the layout origin; callers measure the ink box from the result.
    /// Sizes below one pixel use the built-in font.
    pub fn rasterize(&mut self, text: &str, font_size: f32) -> Vec<Coverage> {
        match self {
            LabelFont::Outline(font) if font_size >= MIN_OUTLINE_SIZE => {
                font.rasterize(text, font_size)
            }
            LabelFont::Outline(_) => {
                debug!("Font size {font_size} too small for outline font, using built-in");
                rasterize_builtin(text)
            }
            LabelFont::Builtin => rasterize_builtin(text),
        }
    }
}

fn rasterize_builtin(text: &str) -> Vec<Coverage> {
    let edge = |x, y, width, height| Coverage {
        x,
        y,
        width,
        height,
        alpha: u8::MAX,
    };
    let (w, h) = (BUILTIN_BOX_WIDTH, BUILTIN_BOX_HEIGHT);

    let mut coverage = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let x = i as i32 * BUILTIN_ADVANCE;
        coverage.push(edge(x, 0, w, 1));
        coverage.push(edge(x, h as i32 - 1, w, 1));
        coverage.push(edge(x, 1, 1, h - 2));
        coverage.push(edge(x + w as i32 - 1, 1, 1, h - 2));
    }
    coverage
}

/// Font files to try, most preferred first: the override, then the system
/// fonts for this platform, then the same file names in the user font dir.
pub fn candidate_paths(font_override: Option<&Path>) -> Vec<PathBuf> {
    let system = system_font_paths();

    let user = dirs::font_dir()
        .map(|dir| {
            system
                .iter()
                .filter_map(|path| path.file_name())
                .map(|name| dir.join(name))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    font_override
        .map(Path::to_path_buf)
        .into_iter()
        .chain(system)
        .chain(user)
        .collect()
}

#[cfg(target_os = "windows")]
fn system_font_paths() -> Vec<PathBuf> {
    let system_path = std::env::var("SYSTEMROOT").unwrap_or("C:\\Windows".to_string());
    let fonts = Path::new(&system_path).join("Fonts");
    [
        "msyh.ttc",   // Microsoft YaHei
        "simsun.ttc", // SimSun
        "simhei.ttf", // SimHei
        "msjh.ttc",   // Microsoft JhengHei
    ]
    .iter()
    .map(|name| fonts.join(name))
    .collect()
}

#[cfg(target_os = "macos")]
fn system_font_paths() -> Vec<PathBuf> {
    [
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/STHeiti Medium.ttc",
        "/System/Library/Fonts/STHeiti Light.ttc",
        "/System/Library/Fonts/Hiragino Sans GB.ttc",
        "/Library/Fonts/Arial Unicode.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(target_os = "linux")]
fn system_font_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        // Arch Linux
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-zenhei.ttc",
        "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
        // CentOS/RHEL
        "/usr/share/fonts/google-droid/DroidSansFallbackFull.ttf",
        "/usr/share/fonts/truetype/arphic/uming.ttc",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
fn system_font_paths() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_is_tried_first() {
        let custom = PathBuf::from("/opt/fonts/custom.ttf");
        let paths = candidate_paths(Some(&custom));
        assert_eq!(paths.first(), Some(&custom));
        assert_eq!(paths.len(), candidate_paths(None).len() + 1);
    }

    #[test]
    fn missing_font_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = OutlineFont::load(&dir.path().join("nope.ttf")).err().unwrap();
        assert!(matches!(err, FontError::NotFound(_)));
    }

    #[test]
    fn garbage_font_has_no_face() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let err = OutlineFont::load(&path).err().unwrap();
        assert!(matches!(err, FontError::NoFace(_)));
    }

    #[test]
    fn unusable_candidates_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.ttc");
        std::fs::write(&broken, [0u8; 64]).unwrap();

        let font = LabelFont::resolve_from([dir.path().join("missing.ttf"), broken]);
        assert!(font.is_builtin());
        assert_eq!(font.describe(), "built-in");
    }

    #[test]
    fn builtin_draws_one_box_per_visible_char() {
        let coverage = rasterize_builtin("a b");
        // 4 edges per box, the space only advances
        assert_eq!(coverage.len(), 8);
        assert!(coverage.iter().all(|c| c.alpha == u8::MAX));

        let right = coverage.iter().map(|c| c.x + c.width as i32).max().unwrap();
        assert_eq!(right, 2 * BUILTIN_ADVANCE + BUILTIN_BOX_WIDTH as i32);
        let bottom = coverage.iter().map(|c| c.y + c.height as i32).max().unwrap();
        assert_eq!(bottom, BUILTIN_BOX_HEIGHT as i32);
    }

    #[test]
    fn builtin_ignores_font_size() {
        let mut font = LabelFont::Builtin;
        assert_eq!(font.rasterize("飞", 10.0), font.rasterize("飞", 170.0));
    }
}
