//! IPC vs IPV scatter, one marker per year coloured by year.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::ComparativeRecord;
use crate::error::AppError;
use crate::plot::scale::{BACKGROUND, ColorScale, FOREGROUND, GRID, draw_colorbar};
use crate::plot::{min_max, padded_bounds};

pub const FILE_NAME: &str = "correlacion_ipc_ipv.html";
pub const TITLE: &str = "Correlacion IPC vs IPV";

const SIZE: (u32, u32) = (1000, 600);
const COLORBAR_WIDTH: u32 = 90;
const SCALE: ColorScale = ColorScale::Plasma;

/// One scatter point: IPC mean, IPV mean, year and ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub ipc: f64,
    pub ipv: f64,
    pub anyo: i32,
    pub ratio: f64,
}

/// Rows with IPC mean, IPV mean and ratio all present.
pub fn scatter_points(rows: &[ComparativeRecord]) -> Vec<ScatterPoint> {
    rows.iter()
        .filter(|r| r.ipc_mean.is_finite() && r.ipv_mean.is_finite())
        .filter_map(|r| {
            Some(ScatterPoint {
                ipc: r.ipc_mean,
                ipv: r.ipv_mean,
                anyo: r.anyo,
                ratio: r.ratio?,
            })
        })
        .collect()
}

pub fn render_correlation_svg(rows: &[ComparativeRecord]) -> Result<String, AppError> {
    let points = scatter_points(rows);
    if points.is_empty() {
        return Err(AppError::output("No complete IPC/IPV rows to plot."));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        draw(&root, &points)
            .map_err(|e| AppError::output(format!("Failed to draw correlation chart: {e}")))?;
    }
    Ok(svg)
}

fn draw(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    points: &[ScatterPoint],
) -> Result<(), Box<dyn std::error::Error>> {
    root.fill(&BACKGROUND)?;
    let (plot_area, legend_area) = root.split_horizontally(SIZE.0 - COLORBAR_WIDTH);

    let (x0, x1) = padded_bounds(points.iter().map(|p| p.ipc), 0.08);
    let (y0, y1) = padded_bounds(points.iter().map(|p| p.ipv), 0.08);
    let (year_min, year_max) =
        min_max(points.iter().map(|p| p.anyo as f64)).unwrap_or((0.0, 1.0));

    let mut chart = ChartBuilder::on(&plot_area)
        .caption(TITLE, ("sans-serif", 20).into_font().color(&FOREGROUND))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("IPC")
        .y_desc("IPV")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{v:.1}"))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .label_style(("sans-serif", 12).into_font().color(&FOREGROUND))
        .axis_style(&FOREGROUND)
        .bold_line_style(&GRID)
        .light_line_style(&BACKGROUND)
        .draw()?;

    let label_font = ("sans-serif", 11).into_font().color(&FOREGROUND);
    chart.draw_series(points.iter().map(|p| {
        let color = SCALE.map(p.anyo as f64, year_min, year_max);
        EmptyElement::at((p.ipc, p.ipv))
            + Circle::new((0, 0), 9, color.filled())
            + Circle::new((0, 0), 9, WHITE.stroke_width(1))
            + Text::new(
                format!("{} ({:.2})", p.anyo, p.ratio),
                (12, -14),
                label_font.clone(),
            )
    }))?;

    draw_colorbar(&legend_area, SCALE, (year_min, year_max), "Anyo", |v| {
        format!("{v:.0}")
    })?;

    root.present()?;
    Ok(())
}
