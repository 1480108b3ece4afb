use std::f64::consts::PI;

/// Web-Mercator tile edge used by the basemap service, in pixels.
const TILE_PX: f64 = 512.0;

// ---------------------------------------------------------------------------
// Viewport – a fixed camera over the operating region
// ---------------------------------------------------------------------------

/// A flat Web-Mercator view: geographic centre, zoom and pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// New York City, matching the basemap request.
    pub const NYC: Viewport = Viewport {
        center_lat: 40.73,
        center_lon: -73.93,
        zoom: 10.0,
        width: 960.0,
        height: 600.0,
    };

    /// Pixel position of `(lon, lat)` relative to the viewport's top-left
    /// corner, or `None` when it falls outside.
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f32, f32)> {
        let (cx, cy) = mercator(self.center_lon, self.center_lat, self.zoom);
        let (px, py) = mercator(lon, lat, self.zoom);
        let x = px - cx + self.width as f64 / 2.0;
        let y = py - cy + self.height as f64 / 2.0;
        let inside = (0.0..self.width as f64).contains(&x) && (0.0..self.height as f64).contains(&y);
        inside.then_some((x as f32, y as f32))
    }
}

/// World pixel coordinates of `(lon, lat)` at `zoom`.
fn mercator(lon: f64, lat: f64, zoom: f64) -> (f64, f64) {
    let world = TILE_PX * 2f64.powf(zoom);
    let x = (lon + 180.0) / 360.0 * world;
    let sin_lat = lat.to_radians().sin().clamp(-0.9999, 0.9999);
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * world;
    (x, y)
}

// ---------------------------------------------------------------------------
// HeatGrid – smoothed point density over the viewport
// ---------------------------------------------------------------------------

/// Density grid in screen space. Intensities are normalized to `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatGrid {
    pub columns: usize,
    pub rows: usize,
    /// Edge of one square cell, in viewport pixels.
    pub cell_px: f32,
    /// Row-major, `columns * rows` values.
    pub intensity: Vec<f32>,
    /// Points that landed inside the viewport.
    pub points_in_view: usize,
}

impl HeatGrid {
    /// Bin `(lon, lat)` points into `cell_px` cells and spread each cell's
    /// count with a Gaussian kernel reaching `radius_px`.
    pub fn build(
        points: impl IntoIterator<Item = (f64, f64)>,
        viewport: &Viewport,
        cell_px: f32,
        radius_px: f32,
    ) -> Self {
        let columns = (viewport.width / cell_px).ceil().max(1.0) as usize;
        let rows = (viewport.height / cell_px).ceil().max(1.0) as usize;

        let mut counts = vec![0u32; columns * rows];
        let mut points_in_view = 0;
        for (lon, lat) in points {
            if let Some((x, y)) = viewport.project(lon, lat) {
                let col = ((x / cell_px) as usize).min(columns - 1);
                let row = ((y / cell_px) as usize).min(rows - 1);
                counts[row * columns + col] += 1;
                points_in_view += 1;
            }
        }

        let reach = (radius_px / cell_px).ceil().max(0.0) as i64;
        let sigma = (reach as f32 / 3.0).max(0.5);
        let kernel: Vec<(i64, i64, f32)> = (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx * dx + dy * dy <= reach * reach)
            .map(|(dx, dy)| {
                let d2 = (dx * dx + dy * dy) as f32;
                (dx, dy, (-d2 / (2.0 * sigma * sigma)).exp())
            })
            .collect();

        let mut intensity = vec![0f32; columns * rows];
        for (i, &c) in counts.iter().enumerate() {
            if c == 0 {
                continue;
            }
            let (col, row) = ((i % columns) as i64, (i / columns) as i64);
            for &(dx, dy, w) in &kernel {
                let (x, y) = (col + dx, row + dy);
                if x >= 0 && y >= 0 && (x as usize) < columns && (y as usize) < rows {
                    intensity[y as usize * columns + x as usize] += w * c as f32;
                }
            }
        }

        let max = intensity.iter().cloned().fold(0.0f32, f32::max);
        if max > 0.0 {
            intensity.iter_mut().for_each(|v| *v /= max);
        }

        HeatGrid {
            columns,
            rows,
            cell_px,
            intensity,
            points_in_view,
        }
    }

    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.intensity[row * self.columns + col]
    }

    /// Whether no point fell inside the viewport.
    pub fn is_empty(&self) -> bool {
        self.points_in_view == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: Viewport = Viewport {
        center_lat: 40.73,
        center_lon: -73.93,
        zoom: 10.0,
        width: 100.0,
        height: 80.0,
    };

    #[test]
    fn test_center_projects_to_middle() {
        let (x, y) = SMALL.project(-73.93, 40.73).unwrap();
        assert!((x - 50.0).abs() < 1e-3);
        assert!((y - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_orientation() {
        let (x_east, _) = SMALL.project(-73.92, 40.73).unwrap();
        let (_, y_north) = SMALL.project(-73.93, 40.74).unwrap();
        assert!(x_east > 50.0, "east is right");
        assert!(y_north < 40.0, "north is up");
    }

    #[test]
    fn test_far_points_are_outside() {
        assert!(Viewport::NYC.project(-0.12, 51.5).is_none());
        assert!(Viewport::NYC.project(-73.93, 42.0).is_none());
    }

    #[test]
    fn test_single_point_peaks_at_its_cell() {
        let grid = HeatGrid::build([(-73.93, 40.73)], &SMALL, 10.0, 30.0);
        assert_eq!((grid.columns, grid.rows), (10, 8));
        assert_eq!(grid.points_in_view, 1);
        assert!((grid.get(5, 4) - 1.0).abs() < 1e-6);
        assert!(grid.get(6, 4) < 1.0 && grid.get(6, 4) > 0.0);
        assert_eq!(grid.get(0, 0), 0.0);
    }

    #[test]
    fn test_intensity_is_normalized() {
        let pts = vec![(-73.93, 40.73); 50]
            .into_iter()
            .chain([(-73.95, 40.72), (-73.90, 40.75)]);
        let grid = HeatGrid::build(pts, &Viewport::NYC, 8.0, 60.0);
        let max = grid.intensity.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 1.0).abs() < 1e-6);
        assert!(grid.intensity.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_empty_and_out_of_view() {
        let grid = HeatGrid::build(std::iter::empty::<(f64, f64)>(), &SMALL, 10.0, 30.0);
        assert!(grid.is_empty());
        assert!(grid.intensity.iter().all(|&v| v == 0.0));

        let grid = HeatGrid::build([(2.35, 48.85)], &SMALL, 10.0, 30.0);
        assert!(grid.is_empty());
    }
}
