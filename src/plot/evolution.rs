//! Dual-panel time series: annual mean IPC (top) and IPV (bottom).

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::ComparativeRecord;
use crate::error::AppError;
use crate::plot::scale::{BACKGROUND, FOREGROUND, GRID};
use crate::plot::{padded_bounds, year_bounds};

pub const FILE_NAME: &str = "evolucion_temporal.html";
pub const TITLE: &str = "Evolucion Temporal de Indices Economicos";

const SIZE: (u32, u32) = (1000, 700);
const IPC_COLOR: RGBColor = RGBColor(0xFF, 0x6B, 0x6B);
const IPV_COLOR: RGBColor = RGBColor(0x4E, 0xCD, 0xC4);

/// Render the chart as an SVG document.
pub fn render_evolution_svg(rows: &[ComparativeRecord]) -> Result<String, AppError> {
    if rows.is_empty() {
        return Err(AppError::output("No comparative rows to plot."));
    }

    let ipc: Vec<(f64, f64)> = rows.iter().map(|r| (r.anyo as f64, r.ipc_mean)).collect();
    let ipv: Vec<(f64, f64)> = rows.iter().map(|r| (r.anyo as f64, r.ipv_mean)).collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        draw(&root, &ipc, &ipv).map_err(|e| AppError::output(format!("Failed to draw evolution chart: {e}")))?;
    }
    Ok(svg)
}

fn draw(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    ipc: &[(f64, f64)],
    ipv: &[(f64, f64)],
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&BACKGROUND)?;
    let panels = root.margin(10, 10, 10, 10).split_evenly((2, 1));

    draw_panel(&panels[0], "Evolucion del IPC", "IPC", ipc, IPC_COLOR)?;
    draw_panel(&panels[1], "Evolucion del IPV", "IPV", ipv, IPV_COLOR)?;

    root.present()?;
    Ok(())
}

fn draw_panel(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    caption: &str,
    y_desc: &str,
    series: &[(f64, f64)],
    color: RGBColor,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x0, x1) = year_bounds(series.iter().map(|p| p.0));
    let (y0, y1) = padded_bounds(series.iter().map(|p| p.1), 0.05);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 18).into_font().color(&FOREGROUND))
        .margin(8)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Anyo")
        .y_desc(y_desc)
        .x_labels(series.len().clamp(2, 12))
        .y_labels(6)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(("sans-serif", 12).into_font().color(&FOREGROUND))
        .axis_style(&FOREGROUND)
        .bold_line_style(&GRID)
        .light_line_style(&BACKGROUND)
        .draw()?;

    // Lines + markers.
    chart.draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(3)))?;
    chart.draw_series(series.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(anyo: i32, ipc_mean: f64, ipv_mean: f64) -> ComparativeRecord {
        ComparativeRecord {
            anyo,
            ipc_mean,
            ipc_variation: None,
            ipv_mean,
            ipv_variation: None,
            ratio: Some(ipv_mean / ipc_mean),
        }
    }

    #[test]
    fn renders_both_panels() {
        let svg = render_evolution_svg(&[record(2021, 105.0, 210.0), record(2022, 110.0, 220.0)]).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Evolucion del IPC"));
        assert!(svg.contains("Evolucion del IPV"));
    }

    #[test]
    fn renders_a_single_year() {
        let svg = render_evolution_svg(&[record(2021, 105.0, 210.0)]).unwrap();
        assert!(svg.contains("Evolucion del IPV"));
    }

    #[test]
    fn empty_rows_are_rejected() {
        assert!(render_evolution_svg(&[]).is_err());
    }
}
