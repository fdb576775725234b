//! Regional IPC variation choropleth over the autonomous-community boundaries.

use std::collections::HashMap;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::RegionalVariation;
use crate::error::AppError;
use crate::io::boundaries::FeatureCollection;
use crate::plot::min_max;
use crate::plot::scale::{BACKGROUND, ColorScale, FOREGROUND, draw_colorbar};

pub const FILE_NAME: &str = "mapa_ipc_ccaa.html";
pub const TITLE: &str = "Mapa del IPC - Variacion Anual por Comunidad Autonoma (Ultimo periodo)";

const WIDTH: u32 = 1000;
const COLORBAR_WIDTH: u32 = 100;
const SCALE: ColorScale = ColorScale::RdYlGnReversed;
const NO_DATA: RGBColor = RGBColor(70, 70, 70);
/// Slack added below the minimum and above the maximum of the colour range.
pub const RANGE_PADDING: f64 = 0.2;

/// Colour range for `rows`: `[min - 0.2, max + 0.2]`.
pub fn color_range(rows: &[RegionalVariation]) -> Option<(f64, f64)> {
    let (lo, hi) = min_max(rows.iter().map(|r| r.variation))?;
    Some((lo - RANGE_PADDING, hi + RANGE_PADDING))
}

/// Variation per region; for repeated regions the later row colours the map.
fn values_by_region(rows: &[RegionalVariation]) -> HashMap<&str, f64> {
    rows.iter().map(|r| (r.region.as_str(), r.variation)).collect()
}

/// Lon/lat bounding box of the features whose name is in `values`, falling back
/// to every feature when none match.
fn map_bounds(boundaries: &FeatureCollection, values: &HashMap<&str, f64>) -> Option<((f64, f64), (f64, f64))> {
    let bounds_of = |only_matched: bool| -> Option<((f64, f64), (f64, f64))> {
        let points: Vec<(f64, f64)> = boundaries
            .features
            .iter()
            .filter(|f| !only_matched || f.name().is_some_and(|n| values.contains_key(n)))
            .flat_map(|f| f.outer_rings())
            .flatten()
            .collect();
        let lon = min_max(points.iter().map(|p| p.0))?;
        let lat = min_max(points.iter().map(|p| p.1))?;
        Some((lon, lat))
    };
    bounds_of(true).or_else(|| bounds_of(false))
}

pub fn render_choropleth_svg(
    rows: &[RegionalVariation],
    boundaries: &FeatureCollection,
) -> Result<String, AppError> {
    let range = color_range(rows).ok_or_else(|| AppError::output("No regional rows to plot."))?;
    let values = values_by_region(rows);
    let ((lon0, lon1), (lat0, lat1)) = map_bounds(boundaries, &values)
        .ok_or_else(|| AppError::config("Boundary file contains no polygons."))?;

    let unmatched: Vec<&str> = values
        .keys()
        .copied()
        .filter(|name| !boundaries.features.iter().any(|f| f.name() == Some(*name)))
        .collect();
    if !unmatched.is_empty() {
        tracing::warn!(regions = ?unmatched, "regions missing from the boundary file");
    }

    // Equirectangular projection: shrink longitude by cos(mid latitude).
    let mid_lat = ((lat0 + lat1) / 2.0).to_radians();
    let lon_span = ((lon1 - lon0) * mid_lat.cos()).max(1e-6);
    let lat_span = (lat1 - lat0).max(1e-6);
    let map_width = (WIDTH - COLORBAR_WIDTH) as f64;
    let height = ((map_width * lat_span / lon_span) as u32 + 80).clamp(400, 900);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, height)).into_drawing_area();
        draw(&root, boundaries, &values, range, ((lon0, lon1), (lat0, lat1)))
            .map_err(|e| AppError::output(format!("Failed to draw regional map: {e}")))?;
    }
    Ok(svg)
}

fn draw(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    boundaries: &FeatureCollection,
    values: &HashMap<&str, f64>,
    range: (f64, f64),
    bounds: ((f64, f64), (f64, f64)),
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&BACKGROUND)?;
    let (map_area, legend_area) = root.split_horizontally(WIDTH - COLORBAR_WIDTH);
    let ((lon0, lon1), (lat0, lat1)) = bounds;

    // No axes: the map is the whole plotting area.
    let mut chart = ChartBuilder::on(&map_area)
        .caption(TITLE, ("sans-serif", 18).into_font().color(&FOREGROUND))
        .margin(10)
        .build_cartesian_2d(lon0..lon1, lat0..lat1)?;

    for feature in &boundaries.features {
        let fill = feature
            .name()
            .and_then(|name| values.get(name))
            .map(|v| SCALE.map(*v, range.0, range.1))
            .unwrap_or(NO_DATA);

        for ring in feature.outer_rings() {
            chart.draw_series(std::iter::once(Polygon::new(ring.clone(), fill.filled())))?;
            chart.draw_series(std::iter::once(PathElement::new(ring, WHITE.stroke_width(1))))?;
        }
    }

    draw_colorbar(&legend_area, SCALE, range, "IPC (%)", |v| format!("{v:.1}%"))?;

    root.present()?;
    Ok(())
}
