//! Continuous colour scales and the colour bar drawn next to charts.

use plotters::coord::Shift;
use plotters::prelude::*;

/// Page and chart background (dark theme).
pub const BACKGROUND: RGBColor = RGBColor(17, 17, 17);
pub const FOREGROUND: RGBColor = RGBColor(242, 245, 250);
pub const GRID: RGBColor = RGBColor(40, 52, 66);

/// ColorBrewer RdYlGn, reversed: low values green, high values red.
const RDYLGN_R: [(u8, u8, u8); 11] = [
    (0, 104, 55),
    (26, 152, 80),
    (102, 189, 99),
    (166, 217, 106),
    (217, 239, 139),
    (255, 255, 191),
    (254, 224, 139),
    (253, 174, 97),
    (244, 109, 67),
    (215, 48, 39),
    (165, 0, 38),
];

/// Plasma-like ramp (dark blue -> magenta -> yellow).
const PLASMA: [(u8, u8, u8); 6] = [
    (13, 8, 135),
    (106, 0, 168),
    (177, 42, 144),
    (225, 100, 98),
    (252, 166, 54),
    (240, 249, 33),
];

/// A named colour ramp sampled by linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    RdYlGnReversed,
    Plasma,
}

impl ColorScale {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScale::RdYlGnReversed => &RDYLGN_R,
            ColorScale::Plasma => &PLASMA,
        }
    }

    /// Colour for `t` in `[0, 1]` (clamped).
    pub fn at(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    /// Colour for `value` within `[min, max]`.
    pub fn map(self, value: f64, min: f64, max: f64) -> RGBColor {
        if max > min {
            self.at((value - min) / (max - min))
        } else {
            self.at(0.5)
        }
    }
}

/// Vertical colour bar with a title and five tick labels.
pub fn draw_colorbar(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    scale: ColorScale,
    range: (f64, f64),
    title: &str,
    fmt: fn(f64) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = area.dim_in_pixel();
    let (w, h) = (width as i32, height as i32);
    let top = 50;
    let bottom = h - 50;
    let x0 = 10;
    let x1 = (x0 + 20).min(w);
    if bottom <= top {
        return Ok(());
    }

    let font = ("sans-serif", 13).into_font().color(&FOREGROUND);
    area.draw(&Text::new(title.to_string(), (x0, top - 30), font.clone()))?;

    let steps = bottom - top;
    for step in 0..steps {
        let t = 1.0 - step as f64 / steps as f64;
        let y = top + step;
        area.draw(&Rectangle::new([(x0, y), (x1, y + 1)], scale.at(t).filled()))?;
    }
    area.draw(&Rectangle::new([(x0, top), (x1, bottom)], FOREGROUND.stroke_width(1)))?;

    let (min, max) = range;
    for k in 0..=4 {
        let frac = k as f64 / 4.0;
        let value = max - (max - min) * frac;
        let y = top + (steps as f64 * frac).round() as i32;
        area.draw(&Text::new(fmt(value), (x1 + 6, y - 6), font.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_scale_runs_green_to_red() {
        assert_eq!(ColorScale::RdYlGnReversed.at(0.0), RGBColor(0, 104, 55));
        assert_eq!(ColorScale::RdYlGnReversed.at(0.5), RGBColor(255, 255, 191));
        assert_eq!(ColorScale::RdYlGnReversed.at(1.0), RGBColor(165, 0, 38));
    }

    #[test]
    fn map_clamps_and_handles_flat_ranges() {
        let s = ColorScale::Plasma;
        assert_eq!(s.map(-10.0, 0.0, 1.0), s.at(0.0));
        assert_eq!(s.map(10.0, 0.0, 1.0), s.at(1.0));
        assert_eq!(s.map(3.0, 3.0, 3.0), s.at(0.5));
        assert_eq!(s.at(f64::NAN), s.at(0.0));
    }
}
