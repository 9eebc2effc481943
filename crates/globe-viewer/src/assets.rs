//! Globe texture discovery and decoding.
//!
//! Textures are matched by file stem anywhere under the assets directory:
//!
//! | slot      | stems                         |
//! |-----------|-------------------------------|
//! | color     | `earthmap*`, `*color*`        |
//! | elevation | `*bump*`, `*elev*`, `*height*`|
//! | specular  | `*spec*`, `*alpha*`, `*water*`|
//! | highlight | `*rainbow*`, `*highlight*`    |
//!
//! A missing or undecodable file falls back to a generated texture, so the
//! globe always renders.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Color,
    Elevation,
    Specular,
    Highlight,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 4] = [
        TextureSlot::Color,
        TextureSlot::Elevation,
        TextureSlot::Specular,
        TextureSlot::Highlight,
    ];

    fn matches(self, stem: &str) -> bool {
        let keys: &[&str] = match self {
            TextureSlot::Color => &["earthmap", "color", "colour"],
            TextureSlot::Elevation => &["bump", "elev", "height"],
            TextureSlot::Specular => &["spec", "alpha", "water"],
            TextureSlot::Highlight => &["rainbow", "highlight"],
        };
        keys.iter().any(|k| stem.contains(k))
    }

    /// Color-bearing maps are sRGB; data maps are sampled linearly.
    pub fn is_srgb(self) -> bool {
        matches!(self, TextureSlot::Color | TextureSlot::Highlight)
    }

    pub fn label(self) -> &'static str {
        match self {
            TextureSlot::Color => "Globe Color",
            TextureSlot::Elevation => "Globe Elevation",
            TextureSlot::Specular => "Globe Specular",
            TextureSlot::Highlight => "Globe Highlight",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetPaths {
    pub color: Option<PathBuf>,
    pub elevation: Option<PathBuf>,
    pub specular: Option<PathBuf>,
    pub highlight: Option<PathBuf>,
}

impl AssetPaths {
    pub fn get(&self, slot: TextureSlot) -> Option<&Path> {
        match slot {
            TextureSlot::Color => self.color.as_deref(),
            TextureSlot::Elevation => self.elevation.as_deref(),
            TextureSlot::Specular => self.specular.as_deref(),
            TextureSlot::Highlight => self.highlight.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: TextureSlot) -> &mut Option<PathBuf> {
        match slot {
            TextureSlot::Color => &mut self.color,
            TextureSlot::Elevation => &mut self.elevation,
            TextureSlot::Specular => &mut self.specular,
            TextureSlot::Highlight => &mut self.highlight,
        }
    }
}

/// Walks `root` and assigns the first matching image (in sorted order) to each slot.
pub fn discover(root: &Path) -> AssetPaths {
    let mut found = AssetPaths::default();

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|s| EXTENSIONS.contains(&s.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let stem = stem.to_ascii_lowercase();
        for slot in TextureSlot::ALL {
            let entry = found.slot_mut(slot);
            if entry.is_none() && slot.matches(&stem) {
                *entry = Some(path.clone());
                break;
            }
        }
    }

    for slot in TextureSlot::ALL {
        match found.get(slot) {
            Some(p) => log::info!("{}: {}", slot.label(), p.display()),
            None => log::warn!(
                "{}: no texture under '{}', using fallback",
                slot.label(),
                root.display()
            ),
        }
    }
    found
}

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub srgb: bool,
}

impl TextureData {
    pub fn decode(path: &Path, srgb: bool) -> anyhow::Result<Self> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
            srgb,
        })
    }

    /// Replacement used when a slot has no usable file.
    pub fn fallback(slot: TextureSlot) -> Self {
        match slot {
            // Flat blue, elevation zero, no water (fully opaque).
            TextureSlot::Color => Self::solid([0x00, 0x99, 0xff, 0xff], true),
            TextureSlot::Elevation => Self::solid([0, 0, 0, 0xff], false),
            TextureSlot::Specular => Self::solid([0, 0, 0, 0xff], false),
            TextureSlot::Highlight => Self::hue_ramp(256),
        }
    }

    fn solid(px: [u8; 4], srgb: bool) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: px.to_vec(),
            srgb,
        }
    }

    /// Horizontal rainbow, one texel per step around the hue wheel.
    fn hue_ramp(width: u32) -> Self {
        let rgba = (0..width)
            .flat_map(|i| {
                let h = i as f32 / width as f32 * 6.0;
                let x = 1.0 - ((h % 2.0) - 1.0).abs();
                let (r, g, b) = match h as u32 {
                    0 => (1.0, x, 0.0),
                    1 => (x, 1.0, 0.0),
                    2 => (0.0, 1.0, x),
                    3 => (0.0, x, 1.0),
                    4 => (x, 0.0, 1.0),
                    _ => (1.0, 0.0, x),
                };
                [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 0xff]
            })
            .collect();
        Self {
            width,
            height: 1,
            rgba,
            srgb: true,
        }
    }

    /// Decodes the slot's file if present, otherwise (or on error) the fallback.
    pub fn load_or_fallback(slot: TextureSlot, path: Option<&Path>) -> Self {
        match path.map(|p| (p, Self::decode(p, slot.is_srgb()))) {
            Some((_, Ok(tex))) => tex,
            Some((p, Err(e))) => {
                log::error!("Failed to decode {}: {}", p.display(), e);
                Self::fallback(slot)
            }
            None => Self::fallback(slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("globe_viewer_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("nested")).unwrap();
        dir
    }

    #[test]
    fn discovers_by_stem() {
        let dir = scratch_dir("discover");
        for f in ["earthmap4k.jpg", "nested/earthbump.jpg", "earthspec.png", "notes.txt"] {
            fs::write(dir.join(f), b"").unwrap();
        }

        let found = discover(&dir);
        assert!(found.color.unwrap().ends_with("earthmap4k.jpg"));
        assert!(found.elevation.unwrap().ends_with("nested/earthbump.jpg"));
        assert!(found.specular.unwrap().ends_with("earthspec.png"));
        assert!(found.highlight.is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_dir_yields_nothing() {
        let found = discover(Path::new("/nonexistent/globe/assets"));
        assert!(TextureSlot::ALL.iter().all(|s| found.get(*s).is_none()));
    }

    #[test]
    fn undecodable_file_falls_back() {
        let dir = scratch_dir("decode");
        let bogus = dir.join("earthmap.jpg");
        fs::write(&bogus, b"not a jpeg").unwrap();

        let tex = TextureData::load_or_fallback(TextureSlot::Color, Some(&bogus));
        assert_eq!((tex.width, tex.height), (1, 1));
        assert!(tex.srgb);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn decodes_png() {
        let dir = scratch_dir("png");
        let path = dir.join("rainbow.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let tex = TextureData::load_or_fallback(TextureSlot::Highlight, Some(&path));
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(&tex.rgba[..4], &[10, 20, 30, 255]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn fallbacks_are_well_formed() {
        for slot in TextureSlot::ALL {
            let t = TextureData::fallback(slot);
            assert_eq!(t.rgba.len(), (t.width * t.height * 4) as usize);
        }
    }
}
