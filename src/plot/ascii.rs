//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - ideal curve: `-` line
//! - tolerance band edges: `.` lines
//! - training samples: `o`
//! - classified test points: `x`

use crate::domain::{ChosenIdeal, ClassificationRecord, Curve, Sample};

/// Training samples against their chosen ideal curve and tolerance band.
pub fn render_selection_plot(chosen: &ChosenIdeal, width: usize, height: usize) -> String {
    let mut out = format!(
        "{} -> {} | SSE={:.4} | tolerance={:.4}\n",
        chosen.training().name(),
        chosen.ideal().name(),
        chosen.selection.error,
        chosen.tolerance,
    );
    let points: Vec<(f64, f64, char)> = chosen.training().iter().map(|s| (s.x, s.y, 'o')).collect();
    out.push_str(&render_band_plot(chosen.ideal(), chosen.tolerance, &points, width, height));
    out
}

/// Test points assigned to `ideal`, drawn over the ideal curve and its band.
///
/// Records assigned to other ideals (or unclassified) are ignored.
pub fn render_classification_plot(
    ideal: &Curve,
    tolerance: f64,
    records: &[ClassificationRecord],
    width: usize,
    height: usize,
) -> String {
    let assigned: Vec<&Sample> = records
        .iter()
        .filter(|r| r.ideal_name() == Some(ideal.name()))
        .map(|r| &r.point)
        .collect();

    let mut out = format!(
        "{} | {} test point(s) | tolerance={:.4}\n",
        ideal.name(),
        assigned.len(),
        tolerance
    );
    let points: Vec<(f64, f64, char)> = assigned.iter().map(|s| (s.x, s.y, 'x')).collect();
    out.push_str(&render_band_plot(ideal, tolerance, &points, width, height));
    out
}

fn render_band_plot(
    ideal: &Curve,
    tolerance: f64,
    points: &[(f64, f64, char)],
    width: usize,
    height: usize,
) -> String {
    let line: Vec<(f64, f64)> = ideal.iter().map(|s| (s.x, s.y)).collect();
    let mut lines: Vec<(Vec<(f64, f64)>, char)> = vec![(line.clone(), '-')];
    if tolerance.is_finite() && tolerance > 0.0 {
        lines.push((line.iter().map(|&(x, y)| (x, y + tolerance)).collect(), '.'));
        lines.push((line.iter().map(|&(x, y)| (x, y - tolerance)).collect(), '.'));
    }
    render_plot(&lines, points, width, height)
}

fn render_plot(
    lines: &[(Vec<(f64, f64)>, char)],
    points: &[(f64, f64, char)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let all_xy = lines
        .iter()
        .flat_map(|(l, _)| l.iter().copied())
        .chain(points.iter().map(|&(x, y, _)| (x, y)));
    let (x_min, x_max, y_min, y_max) = ranges(all_xy);
    let (x_min, x_max) = x_min.zip(x_max).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_min.zip(y_max).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw lines first (so points can overlay); earlier lines win shared cells.
    for (line, ch) in lines {
        draw_curve(&mut grid, line, x_min, x_max, y_min, y_max, *ch);
    }

    for &(x, y, ch) in points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = ch;
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | y=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Finite min/max of x and y; a range is `None` when it is empty or degenerate.
fn ranges(xy: impl Iterator<Item = (f64, f64)>) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in xy {
        if x.is_finite() {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    let (x_lo, x_hi) = if max_x > min_x { (Some(min_x), Some(max_x)) } else { (None, None) };
    let (y_lo, y_hi) = if max_y > min_y { (Some(min_y), Some(max_y)) } else { (None, None) };
    (x_lo, x_hi, y_lo, y_hi)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    curve: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    if curve.is_empty() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, ch),
            None if grid[row][col] == ' ' => grid[row][col] = ch,
            None => {}
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
