//! Arrow asset loading and scene geometry

use egui::{pos2, vec2, ColorImage, Pos2, Rect, Vec2};
use std::path::{Path, PathBuf};

/// Scene coordinates visible in the view, origin at the center
pub const SCENE_RECT: Rect = Rect::from_min_max(pos2(-200.0, -200.0), pos2(200.0, 200.0));

/// Top-left corner of the arrow in scene coordinates
pub const ARROW_POS: Pos2 = pos2(-50.0, -50.0);

/// Box the arrow image is fitted into, in scene units
pub const ARROW_SIZE: Vec2 = vec2(100.0, 100.0);

const ARROW_FILE: &str = "red_arrow.png";

/// Places the asset may live: next to the executable, then in the crate
fn asset_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        candidates.push(dir.join("assets").join(ARROW_FILE));
    }
    candidates.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets").join(ARROW_FILE));
    candidates
}

/// Load the arrow image from the first location that has it
pub fn load_arrow_image() -> Result<ColorImage, String> {
    let candidates = asset_candidates();
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .ok_or_else(|| format!("{} not found (looked in {:?})", ARROW_FILE, candidates))?;

    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let image = decode_image(&bytes).map_err(|e| format!("{}: {}", path.display(), e))?;
    log::info!("Loaded arrow image {} ({}x{})", path.display(), image.size[0], image.size[1]);
    Ok(image)
}

/// Decode PNG bytes into an egui image
pub fn decode_image(bytes: &[u8]) -> Result<ColorImage, String> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Largest size with the image's aspect ratio that fits in `bounds`
pub fn fitted_size(image: Vec2, bounds: Vec2) -> Vec2 {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Vec2::ZERO;
    }
    let scale = (bounds.x / image.x).min(bounds.y / image.y);
    image * scale
}

/// Maps scene coordinates onto a screen rectangle, keeping aspect ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    scale: f32,
    offset: Vec2,
}

impl SceneTransform {
    /// Fit `scene` centered inside `viewport`
    pub fn fit(scene: Rect, viewport: Rect) -> Self {
        let scale = (viewport.width() / scene.width()).min(viewport.height() / scene.height());
        let offset = viewport.center().to_vec2() - scene.center().to_vec2() * scale;
        Self { scale, offset }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_screen(&self, scene_pos: Pos2) -> Pos2 {
        (scene_pos.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Screen rectangle of the arrow image with the given pixel size
    pub fn arrow_rect(&self, image_size: Vec2) -> Rect {
        let slot = Rect::from_min_size(self.to_screen(ARROW_POS), ARROW_SIZE * self.scale);
        Rect::from_center_size(slot.center(), fitted_size(image_size, slot.size()))
    }
}
