use std::path::Path;

use crate::core::color::Color;
use crate::core::geometry::AssetError;

/// Decoded RGB8 image referenced by a material's `map_Kd` line.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // tightly packed RGB8, row-major
}

impl Texture {
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_path_buf()));
        }
        let img = image::open(path)
            .map_err(|source| AssetError::Texture {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        Ok(Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        })
    }
}

/// Tagged material with explicit per-channel defaults. Replaces the
/// attribute-bag approach: absent channels stay `None` and `base_color`
/// resolves the fallback chain in one place.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub ambient: Option<Color>,
    pub diffuse: Option<Color>,
    pub specular: Option<Color>,
    pub emissive: Option<Color>,
    /// Transparency scalar ("d" in the .mtl); 1.0 is fully opaque.
    pub dissolve: f32,
    pub diffuse_texture: Option<Texture>,
}

impl Material {
    /// Convert a parsed .mtl entry, decoding any referenced diffuse texture
    /// relative to the directory the .obj lives in.
    pub fn from_tobj(mat: &tobj::Material, base_dir: &Path) -> Result<Self, AssetError> {
        let diffuse_texture = match &mat.diffuse_texture {
            Some(rel) => Some(Texture::load(&base_dir.join(rel))?),
            None => None,
        };
        // tobj surfaces Ke through the unknown-parameter map.
        let emissive = mat.unknown_param.get("Ke").and_then(|s| parse_color_triple(s));
        Ok(Self {
            name: mat.name.clone(),
            ambient: mat.ambient.map(Color::from_rgb),
            diffuse: mat.diffuse.map(Color::from_rgb),
            specular: mat.specular.map(Color::from_rgb),
            emissive,
            dissolve: mat.dissolve.unwrap_or(1.0),
            diffuse_texture,
        })
    }

    /// Diffuse if present, else ambient, else white.
    pub fn base_color(&self) -> Color {
        self.diffuse.or(self.ambient).unwrap_or(Color::WHITE)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ambient: Some(Color::new(0.2, 0.2, 0.2)),
            diffuse: Some(Color::new(0.8, 0.8, 0.8)),
            specular: Some(Color::BLACK),
            emissive: Some(Color::BLACK),
            dissolve: 1.0,
            diffuse_texture: None,
        }
    }
}

fn parse_color_triple(s: &str) -> Option<Color> {
    let mut it = s.split_whitespace().map(|t| t.parse::<f32>().ok());
    let r = it.next()??;
    let g = it.next()??;
    let b = it.next()??;
    Some(Color::new(r, g, b))
}
