//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each grade is drawn as a polyline using its marker (`P`, `M`, `L`).
//! Grades are drawn in order and never overwrite an earlier grade's cells.

use crate::domain::{History, QualityGrade, time_point};

/// Render the windowed history of every grade on one chart.
pub fn render_history_plot(history: &History, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut series: Vec<(QualityGrade, Vec<(f64, f64)>)> = Vec::with_capacity(history.len());
    for (&grade, points) in history {
        if points.is_empty() {
            continue;
        }
        let pts = points
            .iter()
            .map(|p| (time_point(p.year, p.month), p.price))
            .collect();
        series.push((grade, pts));
    }

    let all = || series.iter().flat_map(|(_, pts)| pts.iter().copied());
    let Some((t_min, t_max)) = value_range(all().map(|(t, _)| t)) else {
        return "Plot: (no data)\n".to_string();
    };
    let Some((y_min, y_max)) = value_range(all().map(|(_, y)| y)) else {
        return "Plot: (no data)\n".to_string();
    };
    let (t_min, t_max) = if t_max > t_min { (t_min, t_max) } else { pad_range(t_min, t_max, 0.0) };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (grade, pts) in &series {
        draw_series(&mut grid, pts, grade.marker(), t_min, t_max, y_min, y_max);
    }

    // Build final string. We include a small header with ranges and a legend.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: time=[{t_min:.3}, {t_max:.3}] | price=[{y_min:.2}, {y_max:.2}]\n"
    ));
    let legend: Vec<String> = series
        .iter()
        .map(|(g, _)| format!("{}={}", g.marker(), g.display_name()))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(" ")));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v.is_finite() && max_v.is_finite() {
        Some((min_v, max_v))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(
    grid: &mut [Vec<char>],
    points: &[(f64, f64)],
    ch: char,
    t_min: f64,
    t_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let Some(width) = grid.first().map(Vec::len) else {
        return;
    };

    let mut prev = None;
    for &(t, y) in points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, x, yy, ch),
            None => draw_line(grid, x, yy, x, yy, ch),
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham). Only blank cells are written.
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
        if let Some(cell) = usize::try_from(y0)
            .ok()
            .and_then(|r| grid.get_mut(r))
            .and_then(|row| usize::try_from(x0).ok().and_then(|c| row.get_mut(c)))
        {
            if *cell == ' ' {
                *cell = ch;
            }
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
