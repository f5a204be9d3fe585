//! Chart rendering — similarity bar and keyword-coverage pie, side by side,
//! written as SVG to a fixed path that every analysis overwrites.

use std::io::Write;
use std::path::{Path, PathBuf};

use plotters::element::Pie;
use plotters::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::errors::AppError;

const CHART_SIZE: (u32, u32) = (900, 420);
const MATCHED_COLOR: RGBColor = RGBColor(46, 139, 87);
const UNMATCHED_COLOR: RGBColor = RGBColor(205, 92, 92);
const BAR_COLOR: RGBColor = RGBColor(65, 105, 225);

#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub path: PathBuf,
    pub url: String,
}

/// Renders the chart and atomically replaces the file at `path`.
pub fn render_chart(
    similarity_score: f32,
    result: &AnalysisResult,
    path: &Path,
    url: String,
) -> Result<ChartArtifact, AppError> {
    let svg = render_svg(similarity_score, result)?;

    let dir = path
        .parent()
        .ok_or_else(|| AppError::Chart(format!("chart path {} has no parent", path.display())))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(svg.as_bytes())?;
    tmp.persist(path).map_err(|e| AppError::Io(e.error))?;

    info!("Chart written to {}", path.display());

    Ok(ChartArtifact {
        path: path.to_path_buf(),
        url,
    })
}

/// Renders both panels into an SVG document.
pub fn render_svg(similarity_score: f32, result: &AnalysisResult) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let panels = root.split_evenly((1, 2));
        draw_similarity_bar(&panels[0], similarity_score)?;
        draw_keyword_pie(&panels[1], result)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn draw_similarity_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    similarity_score: f32,
) -> Result<(), AppError> {
    let percentage = f64::from(similarity_score.clamp(0.0, 1.0)) * 100.0;

    let mut chart = ChartBuilder::on(area)
        .caption("Resume Similarity", ("sans-serif", 22.0).into_font())
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, 0.0..100.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_desc("Similarity (%)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(0.25, 0.0), (0.75, percentage)],
            BAR_COLOR.filled(),
        )))
        .map_err(chart_err)?;

    chart
        .draw_series(std::iter::once(Text::new(
            format!("{percentage:.1}%"),
            (0.42, (percentage + 4.0).min(96.0)),
            ("sans-serif", 16.0).into_font(),
        )))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_keyword_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    result: &AnalysisResult,
) -> Result<(), AppError> {
    let area = area
        .titled("Keyword Match", ("sans-serif", 22.0).into_font())
        .map_err(chart_err)?;

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);

    if result.total_keywords == 0 {
        area.draw(&Text::new(
            "No keywords found",
            (center.0 - 70, center.1),
            ("sans-serif", 18.0).into_font(),
        ))
        .map_err(chart_err)?;
        return Ok(());
    }

    let matched = result.matched_keywords.len();
    let unmatched = result.total_keywords - matched;

    let radius = f64::from(width.min(height)) * 0.32;
    let sizes = [matched as f64, unmatched as f64];
    let colors = [MATCHED_COLOR, UNMATCHED_COLOR];
    let labels = ["Matched", "Unmatched"];

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 16.0).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 14.0).into_font().color(&WHITE));
    area.draw(&pie).map_err(chart_err)?;

    Ok(())
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Chart(e.to_string())
}
