// src/charts.rs
//
// Server-side charts, rendered straight into SVG strings and inlined into
// the dashboard page. No files touch disk.

use crate::domain::aggregate::{DeptCount, WorkflowSlice};
use crate::errors::ServerError;
use plotters::prelude::*;

const BAR_SIZE: (u32, u32) = (640, 320);
const PIE_SIZE: (u32, u32) = (420, 320);

// tab10, same palette order the old dashboard used.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const EMPTY_SVG: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="640" height="60">"#,
    r#"<text x="10" y="35" font-family="sans-serif" font-size="14">"#,
    "No data to chart</text></svg>"
);

/// Vertical bar chart of permit counts per department, in the order the
/// counts arrive (descending).
pub fn department_bar_svg(counts: &[DeptCount]) -> Result<String, ServerError> {
    if counts.is_empty() {
        return Ok(EMPTY_SVG.to_string());
    }

    let labels: Vec<String> = counts.iter().map(|c| c.department.clone()).collect();
    let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0);
    let n = counts.len() as i32;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, BAR_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ServerError::ChartError(format!("Failed to fill chart area: {e}")))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .x_label_area_size(70)
            .y_label_area_size(50)
            .build_cartesian_2d((0..n).into_segmented(), 0..max_count + 1)
            .map_err(|e| ServerError::ChartError(format!("Failed to build bar chart: {e}")))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(counts.len())
            .x_label_formatter(&|x| match x {
                SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => labels
                    .get(*i as usize)
                    .cloned()
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .y_desc("Permit Count")
            .draw()
            .map_err(|e| ServerError::ChartError(format!("Failed to draw chart mesh: {e}")))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, c)| {
                let x0 = SegmentValue::Exact(i as i32);
                let x1 = SegmentValue::Exact(i as i32 + 1);
                let mut bar = Rectangle::new([(x0, 0), (x1, c.count)], PALETTE[0].filled());
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(|e| ServerError::ChartError(format!("Failed to draw bars: {e}")))?;

        root.present()
            .map_err(|e| ServerError::ChartError(format!("Failed to render chart: {e}")))?;
    }

    Ok(svg)
}

/// Pie of workflow states. Slice labels carry their literal counts, so the
/// chart stays readable without a tooltip layer.
pub fn workflow_pie_svg(slices: &[WorkflowSlice]) -> Result<String, ServerError> {
    let total: u64 = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        return Ok(EMPTY_SVG.to_string());
    }

    let sizes: Vec<f64> = slices.iter().map(|s| s.count as f64).collect();
    let colors: Vec<RGBColor> = slices
        .iter()
        .enumerate()
        .map(|(i, _)| PALETTE[i % PALETTE.len()])
        .collect();
    let labels: Vec<String> = slices.iter().map(|s| s.label.clone()).collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ServerError::ChartError(format!("Failed to fill chart area: {e}")))?;

        let center = (PIE_SIZE.0 as i32 / 2, PIE_SIZE.1 as i32 / 2);
        let radius = 110.0;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 14).into_font());

        root.draw(&pie)
            .map_err(|e| ServerError::ChartError(format!("Failed to draw pie: {e}")))?;
        root.present()
            .map_err(|e| ServerError::ChartError(format!("Failed to render chart: {e}")))?;
    }

    Ok(svg)
}
