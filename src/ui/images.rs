// src/ui/images.rs
use std::collections::{HashMap, HashSet};

use eframe::egui;
use tracing::{debug, warn};

use crate::file::upload::decode_data_url;
use crate::state::SessionState;

/// Textures for data-URL images, keyed by the id of the upload or meal they belong to.
#[derive(Default)]
pub struct ImageCache {
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes on first use. A broken image is remembered so it is not retried every frame.
    pub fn texture(&mut self, ctx: &egui::Context, id: &str, data_url: &str) -> Option<&egui::TextureHandle> {
        if !self.textures.contains_key(id) {
            let texture = match decode_data_url(data_url) {
                Ok(pixels) => {
                    let size = [pixels.width() as usize, pixels.height() as usize];
                    let color = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
                    Some(ctx.load_texture(format!("meal-{id}"), color, egui::TextureOptions::LINEAR))
                }
                Err(e) => {
                    warn!("Could not display image {id}: {e}");
                    None
                }
            };
            self.textures.insert(id.to_string(), texture);
        }

        self.textures.get(id).and_then(Option::as_ref)
    }

    /// Drops textures for images the session no longer holds
    /// (cancelled or failed uploads, replaced previews).
    pub fn retain_live(&mut self, state: &SessionState) {
        let live: HashSet<&str> = state
            .history()
            .iter()
            .map(|meal| meal.id.as_str())
            .chain(state.selected_image.iter().map(|image| image.id.as_str()))
            .collect();

        let before = self.textures.len();
        self.textures.retain(|id, _| live.contains(id.as_str()));
        if self.textures.len() != before {
            debug!("Evicted {} texture(s)", before - self.textures.len());
        }
    }

    /// Shows the image scaled to fit `max`, keeping its aspect ratio.
    pub fn show(&mut self, ui: &mut egui::Ui, id: &str, data_url: &str, max: egui::Vec2) {
        let ctx = ui.ctx().clone();
        match self.texture(&ctx, id, data_url) {
            Some(texture) => {
                let size = texture.size_vec2();
                let scale = (max.x / size.x).min(max.y / size.y).min(1.0);
                let sized = egui::load::SizedTexture::new(texture.id(), size * scale);
                ui.add(egui::Image::new(sized));
            }
            None => {
                ui.label(egui::RichText::new("🖼 Preview unavailable").weak());
            }
        }
    }
}
