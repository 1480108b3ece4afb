use std::sync::Arc;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, CornerRadius, Pos2, Rect, Sense, Ui, Vec2};

use crate::color::{heat_color, HEAT_FLOOR};
use crate::dashboard::DashboardView;
use crate::data::heatmap::Viewport;

const BASEMAP_URI: &str = "bytes://basemap";
const UNSTYLED_BACKGROUND: Color32 = Color32::from_rgb(24, 26, 32);

// ---------------------------------------------------------------------------
// Basemap – optional Mapbox static image behind the heat layer
// ---------------------------------------------------------------------------

/// Static basemap, fetched at most once per process.
pub enum Basemap {
    /// No token configured, or the fetch failed: plain background.
    Unstyled,
    Pending { token: String },
    Ready(Arc<[u8]>),
}

impl Basemap {
    pub fn new(token: Option<String>) -> Self {
        match token {
            Some(token) => Basemap::Pending { token },
            None => Basemap::Unstyled,
        }
    }

    /// Image bytes for `viewport`, fetching on first use.
    fn image(&mut self, viewport: &Viewport) -> Option<Arc<[u8]>> {
        if let Basemap::Pending { token } = self {
            let fetched = fetch_basemap(token, viewport);
            *self = match fetched {
                Ok(bytes) => Basemap::Ready(bytes),
                Err(e) => {
                    log::warn!("Falling back to unstyled map: {e:#}");
                    Basemap::Unstyled
                }
            };
        }
        match self {
            Basemap::Ready(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }
}

/// Mapbox Static Images request for the dark style, framed like `viewport`.
pub fn basemap_url(token: &str, viewport: &Viewport) -> String {
    format!(
        "https://api.mapbox.com/styles/v1/mapbox/dark-v10/static/{lon},{lat},{zoom},0,0/{w}x{h}?access_token={token}",
        lon = viewport.center_lon,
        lat = viewport.center_lat,
        zoom = viewport.zoom,
        w = viewport.width as u32,
        h = viewport.height as u32,
    )
}

fn fetch_basemap(token: &str, viewport: &Viewport) -> Result<Arc<[u8]>> {
    let bytes = reqwest::blocking::get(basemap_url(token, viewport))
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .context("fetching Mapbox basemap")?;
    log::info!("Fetched basemap ({} bytes)", bytes.len());
    Ok(Arc::from(bytes.as_ref()))
}

// ---------------------------------------------------------------------------
// Heatmap of the filtered pickups
// ---------------------------------------------------------------------------

/// Render the heat layer, scaled to the available width.
pub fn heatmap(ui: &mut Ui, view: &DashboardView, basemap: &mut Basemap) {
    ui.heading(format!("Pickup Locations at {}:00", view.criteria.hour));

    let vp = &view.viewport;
    let scale = (ui.available_width() / vp.width).min(1.5);
    let (response, painter) = ui.allocate_painter(Vec2::new(vp.width, vp.height) * scale, Sense::hover());
    let rect = response.rect;

    match basemap.image(vp) {
        Some(bytes) => {
            egui::Image::from_bytes(BASEMAP_URI, egui::load::Bytes::Shared(bytes)).paint_at(ui, rect);
        }
        None => {
            painter.rect_filled(rect, CornerRadius::ZERO, UNSTYLED_BACKGROUND);
        }
    }

    let grid = &view.heatmap;
    let cell = grid.cell_px * scale;
    for row in 0..grid.rows {
        for col in 0..grid.columns {
            let intensity = grid.get(col, row);
            if intensity < HEAT_FLOOR {
                continue;
            }
            let min = rect.min + Vec2::new(col as f32 * cell, row as f32 * cell);
            let cell_rect = Rect::from_min_max(min, Pos2::new(min.x + cell, min.y + cell)).intersect(rect);
            painter.rect_filled(cell_rect, CornerRadius::ZERO, heat_color(intensity));
        }
    }

    if grid.is_empty() {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "No pickups match the current selection",
            egui::FontId::proportional(16.0),
            Color32::GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basemap_url_frames_viewport() {
        let url = basemap_url("pk.test", &Viewport::NYC);
        assert!(url.contains("/static/-73.93,40.73,10,0,0/960x600?"));
        assert!(url.ends_with("access_token=pk.test"));
    }

    #[test]
    fn test_no_token_is_unstyled() {
        let mut map = Basemap::new(None);
        assert!(map.image(&Viewport::NYC).is_none());
        assert!(matches!(map, Basemap::Unstyled));
    }
}
