//! SVG scatter-plot backend built on plotters.

use std::ops::Range;
use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::adapter::{Axis, PlotBackend, RenderError, ScatterScene, SceneKind};
use crate::population::Bounds;
use crate::schema::PlotConfig;

const FONT: &str = "sans-serif";

/// Renders scenes to an SVG file.
#[derive(Debug, Clone)]
pub struct SvgBackend {
    path: PathBuf,
    config: PlotConfig,
}

impl SvgBackend {
    pub fn new<P: AsRef<Path>>(path: P, config: PlotConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlotBackend for SvgBackend {
    fn render(&mut self, scene: &ScatterScene) -> Result<(), RenderError> {
        self.config.validate()?;

        let root = SVGBackend::new(&self.path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        match scene.kind() {
            SceneKind::Planar => draw_planar(&root, scene, &self.config)?,
            SceneKind::Spatial => draw_spatial(&root, scene, &self.config)?,
            SceneKind::SpatialColored => {
                let split = (self.config.width - self.config.colorbar_width) as i32;
                let (plot_area, bar_area) = root.split_horizontally(split);
                draw_spatial(&plot_area, scene, &self.config)?;
                if let Some(color) = scene.color() {
                    draw_colorbar(&bar_area, color)?;
                }
            }
        }

        root.present()?;
        info!("Wrote {} points to {}", scene.len(), self.path.display());
        Ok(())
    }
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn draw_planar(area: &Area<'_>, scene: &ScatterScene, config: &PlotConfig) -> Result<(), RenderError> {
    let (x, y) = (scene.x(), scene.y());

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70);
    if let Some(title) = scene.title() {
        builder.caption(title, (FONT, 20));
    }
    let mut chart = builder.build_cartesian_2d(padded(x.bounds), padded(y.bounds))?;

    chart
        .configure_mesh()
        .x_desc(x.label.as_str())
        .y_desc(y.label.as_str())
        .draw()?;

    let size = config.point_size;
    chart.draw_series(
        x.values
            .iter()
            .zip(&y.values)
            .map(|(&a, &b)| Circle::new((a, b), size, BLUE.filled())),
    )?;

    Ok(())
}

fn draw_spatial(area: &Area<'_>, scene: &ScatterScene, config: &PlotConfig) -> Result<(), RenderError> {
    let (x, y) = (scene.x(), scene.y());
    let Some(z) = scene.z() else {
        return draw_planar(area, scene, config);
    };

    let mut builder = ChartBuilder::on(area);
    builder.margin(20);
    if let Some(title) = scene.title() {
        builder.caption(title, (FONT, 20));
    }
    // plotters draws its y axis vertically, so the third objective goes there.
    let mut chart =
        builder.build_cartesian_3d(padded(x.bounds), padded(z.bounds), padded(y.bounds))?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.35;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart.configure_axes().draw()?;

    let size = config.point_size;
    let colors = scene.color();
    chart.draw_series((0..scene.len()).map(|i| {
        let style = match colors {
            Some(c) => ramp(c.bounds.normalize(c.values[i])).filled(),
            None => BLUE.filled(),
        };
        Circle::new((x.values[i], z.values[i], y.values[i]), size, style)
    }))?;

    let (_, height) = area.dim_in_pixel();
    let legend = [("x", x), ("y", y), ("z", z)];
    for (row, (name, axis)) in legend.iter().enumerate() {
        let top = height as i32 - 20 * (legend.len() - row) as i32;
        area.draw(&Text::new(
            format!("{}: {}", name, axis.label),
            (10, top),
            (FONT, 14).into_font(),
        ))?;
    }

    Ok(())
}

fn draw_colorbar(area: &Area<'_>, axis: &Axis) -> Result<(), RenderError> {
    const STEPS: i32 = 100;
    const TOP: i32 = 40;
    const BAR_WIDTH: i32 = 20;

    let (_, height) = area.dim_in_pixel();
    let bottom = height as i32 - 80;
    let left = 10;
    let step = ((bottom - TOP) / STEPS).max(1);

    for i in 0..STEPS {
        // Highest value at the top.
        let t = 1.0 - i as f64 / (STEPS - 1) as f64;
        let y0 = TOP + i * step;
        area.draw(&Rectangle::new(
            [(left, y0), (left + BAR_WIDTH, y0 + step)],
            ramp(t).filled(),
        ))?;
    }

    let label_x = left + BAR_WIDTH + 4;
    area.draw(&Text::new(format_tick(axis.bounds.max), (label_x, TOP), (FONT, 12).into_font()))?;
    area.draw(&Text::new(
        format_tick(axis.bounds.min),
        (label_x, TOP + STEPS * step - 12),
        (FONT, 12).into_font(),
    ))?;
    area.draw(&Text::new(axis.label.clone(), (left, 10), (FONT, 12).into_font()))?;

    Ok(())
}

/// Blue (low) to red (high) hue ramp.
fn ramp(t: f64) -> HSLColor {
    HSLColor((1.0 - t.clamp(0.0, 1.0)) * 2.0 / 3.0, 0.85, 0.5)
}

fn padded(bounds: Bounds) -> Range<f64> {
    let pad = if bounds.span() > 0.0 {
        bounds.span() * 0.05
    } else {
        bounds.max.abs().max(1.0) * 0.05
    };
    (bounds.min - pad)..(bounds.max + pad)
}

fn format_tick(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1.0e5 || value.abs() < 1.0e-3) {
        format!("{:.3e}", value)
    } else {
        format!("{:.3}", value)
    }
}
