//! ASCII plotting for terminal output.
//!
//! Fixed-size character grid, deterministic output (golden tests below).
//! The series is drawn as `*` segments between consecutive finite points.

use chrono::NaiveDate;

use crate::domain::Decomposition;

use super::{day_offsets, finite_runs, value_range, x_range};

/// Render one series as a titled chart.
pub fn render_time_series(title: &str, dates: &[NaiveDate], values: &[f64], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let xs = day_offsets(dates);
    let (x_min, x_max) = x_range(&xs);
    let (y_min, y_max) = value_range(values).unwrap_or((0.0, 1.0));

    let mut grid = vec![vec![' '; width]; height];
    for run in finite_runs(&xs, values) {
        let mut prev = None;
        for (x, y) in run {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            match prev {
                Some((c0, r0)) => draw_line(&mut grid, c0, r0, col, row, '*'),
                None => grid[row][col] = '*',
            }
            prev = Some((col, row));
        }
    }

    let mut out = String::new();
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "{title}: date=[{first}, {last}] | y=[{y_min:.2}, {y_max:.2}]\n"
        )),
        _ => out.push_str(&format!("{title}: (no data)\n")),
    }
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Observed, trend, seasonal and residual panels stacked vertically.
pub fn render_decomposition(dates: &[NaiveDate], decomposition: &Decomposition, width: usize, panel_height: usize) -> String {
    let panels = [
        ("Observed", &decomposition.observed),
        ("Trend", &decomposition.trend),
        ("Seasonal", &decomposition.seasonal),
        ("Residual", &decomposition.residual),
    ];
    panels
        .iter()
        .map(|(title, values)| render_time_series(title, dates, values, width, panel_height))
        .collect::<Vec<_>>()
        .join("\n")
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // max value on row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Existing marks are left in place.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let (mut x, mut y) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);

    let dx = (x1 - x).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let dy = -(y1 - y).abs();
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid.get_mut(y as usize).and_then(|r| r.get_mut(x as usize)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
