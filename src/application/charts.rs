// src/application/charts.rs
//
// Chart rendering for the three summaries.
//
// ARCHITECTURE:
// - Pure presentation: takes a finished summary, writes one SVG file
// - Category axes are drawn as plain f64 ranges; category names are placed
//   next to the plotting area by hand so long titles do not depend on the
//   tick layout
// - An empty summary is an error, never an empty picture

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{median, GenreCount, RatingsByGenre, TopRatings, MAX_IMDB_RATING};
use crate::error::{AppError, AppResult};

pub const GENRE_COUNTS_FILE: &str = "genre_counts.svg";
pub const TOP_RATINGS_FILE: &str = "top_ratings.svg";
pub const RATINGS_BY_GENRE_FILE: &str = "ratings_by_genre.svg";

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const BOX_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Fraction of a row left empty above and below each bar
const BAR_PADDING: f64 = 0.15;

/// Ensure `dir` exists and return `dir/file`
pub fn chart_path(dir: &Path, file: &str) -> AppResult<PathBuf> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(file))
}

// ============================================================================
// HORIZONTAL BARS
// ============================================================================

struct BarChart<'a> {
    title: String,
    size: (u32, u32),
    x_desc: &'a str,
    y_desc: &'a str,
    label_area: u32,
    labels: Vec<String>,
    values: Vec<f64>,
    /// Smallest upper bound for the value axis
    x_floor: f64,
    grid: bool,
    value_label: fn(f64) -> String,
}

/// Horizontal bar chart of genre counts, largest genre on top
pub fn render_genre_counts(counts: &GenreCount, path: &Path) -> AppResult<()> {
    if counts.is_empty() {
        return Err(AppError::EmptyDataset("no genre counts to chart".to_string()));
    }

    let sorted = counts.sorted_desc();
    let chart = BarChart {
        title: "Genre Count".to_string(),
        size: (800, 600),
        x_desc: "Count",
        y_desc: "Genre",
        label_area: 140,
        labels: sorted.iter().map(|(genre, _)| genre.to_string()).collect(),
        values: sorted.iter().map(|(_, count)| f64::from(*count)).collect(),
        x_floor: 1.0,
        grid: false,
        value_label: |v| format!("{:.0}", v),
    };

    draw_horizontal_bars(&chart, path)?;
    info!("Wrote genre count chart to {}", path.display());
    Ok(())
}

/// Horizontal bar chart of the best rated titles, rank 1 on top
pub fn render_top_ratings(top: &TopRatings, path: &Path) -> AppResult<()> {
    if top.is_empty() {
        return Err(AppError::EmptyDataset("no ratings to chart".to_string()));
    }

    let chart = BarChart {
        title: format!("Top {} IMDb Ratings by Movie", top.len()),
        size: (1400, 800),
        x_desc: "IMDb Rating",
        y_desc: "Movie",
        label_area: 360,
        labels: top.titles().into_iter().map(display_title).collect(),
        values: top.ratings(),
        x_floor: MAX_IMDB_RATING,
        grid: true,
        value_label: |v| format!("{:.1}", v),
    };

    draw_horizontal_bars(&chart, path)?;
    info!("Wrote top ratings chart to {}", path.display());
    Ok(())
}

fn draw_horizontal_bars(spec: &BarChart<'_>, path: &Path) -> AppResult<()> {
    let rows = spec.values.len();
    let x_max = value_axis_max(&spec.values, spec.x_floor);

    let root = SVGBackend::new(path, spec.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, (FONT, 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(spec.label_area)
        .build_cartesian_2d(0f64..x_max, 0f64..rows as f64)
        .map_err(render_err)?;

    let blank = |_: &f64| String::new();
    let mut mesh = chart.configure_mesh();
    mesh.disable_y_mesh()
        .y_label_formatter(&blank)
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .axis_desc_style((FONT, 16));
    if !spec.grid {
        mesh.disable_x_mesh();
    }
    mesh.draw().map_err(render_err)?;

    chart
        .draw_series(spec.values.iter().enumerate().map(|(i, value)| {
            let (top, bottom) = bar_span(rows, i);
            Rectangle::new([(0.0, bottom), (*value, top)], BAR_COLOR.filled())
        }))
        .map_err(render_err)?;

    let value_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    chart
        .draw_series(spec.values.iter().enumerate().map(|(i, value)| {
            Text::new(
                format!(" {}", (spec.value_label)(*value)),
                (*value, row_center(rows, i)),
                value_style.clone(),
            )
        }))
        .map_err(render_err)?;

    let label_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for (i, label) in spec.labels.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(0.0, row_center(rows, i)));
        root.draw(&Text::new(label.clone(), (x - 8, y), label_style.clone()))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

// ============================================================================
// BOX PLOT
// ============================================================================

/// One box per genre (alphabetical), median printed in red above each box
pub fn render_ratings_by_genre(grouped: &RatingsByGenre, path: &Path) -> AppResult<()> {
    if grouped.is_empty() {
        return Err(AppError::EmptyDataset("no genre ratings to chart".to_string()));
    }

    let genres: Vec<(&str, &[f64])> = grouped.iter().collect();
    let columns = genres.len();
    let all_ratings: Vec<f64> = genres.iter().flat_map(|(_, r)| r.iter().copied()).collect();
    let y_max = value_axis_max(&all_ratings, MAX_IMDB_RATING) as f32;

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("IMDb Ratings Distribution by Genre", (FONT, 24))
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..columns as f64, 0f32..y_max)
        .map_err(render_err)?;

    let blank = |_: &f64| String::new();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&blank)
        .x_desc("Genre")
        .y_desc("IMDb Rating")
        .axis_desc_style((FONT, 16))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(genres.iter().enumerate().map(|(i, (_, ratings))| {
            Boxplot::new_vertical(column_center(i), &Quartiles::new(*ratings))
                .width(24)
                .whisker_width(0.5)
                .style(BOX_COLOR.stroke_width(2))
        }))
        .map_err(render_err)?;

    let median_style = TextStyle::from((FONT, 13).into_font())
        .color(&RED)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(genres.iter().enumerate().filter_map(|(i, (_, ratings))| {
            let value = median(*ratings)?;
            Some(Text::new(
                format!("{:.2}", value),
                (column_center(i), value as f32),
                median_style.clone(),
            ))
        }))
        .map_err(render_err)?;

    // Alternate label heights so neighbouring genre names do not collide
    let label_style = TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for (i, (genre, _)) in genres.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(column_center(i), 0f32));
        let offset = if i % 2 == 0 { 8 } else { 26 };
        root.draw(&Text::new(genre.to_string(), (x, y + offset), label_style.clone()))
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    info!("Wrote ratings distribution chart to {}", path.display());
    Ok(())
}

// ============================================================================
// LAYOUT HELPERS
// ============================================================================

/// Upper bound of a value axis: 10% headroom over the largest value, never below `floor`
fn value_axis_max(values: &[f64], floor: f64) -> f64 {
    let largest = values.iter().copied().fold(0.0, f64::max);
    (largest * 1.1).max(floor)
}

/// Center of row `index` when row 0 is drawn at the top of `rows` rows
fn row_center(rows: usize, index: usize) -> f64 {
    (rows - index) as f64 - 0.5
}

/// (top, bottom) of the bar in row `index`
fn bar_span(rows: usize, index: usize) -> (f64, f64) {
    let top = (rows - index) as f64;
    (top - BAR_PADDING, top - 1.0 + BAR_PADDING)
}

fn column_center(index: usize) -> f64 {
    index as f64 + 0.5
}

fn display_title(title: &str) -> String {
    if title.is_empty() {
        "(untitled)".to_string()
    } else {
        title.to_string()
    }
}

fn render_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Render(err.to_string())
}
