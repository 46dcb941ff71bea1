use std::fmt::Display;

use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::analyzer::{ProfileTable, metric};

const BAR_WIDTH: usize = 40;

/// Render the profile as a table with a horizontal bar chart of the selected metric.
pub fn build_profile_table<K: Ord + Display>(
    profile: &ProfileTable<K>,
    chart_metric: &str,
) -> Table {
    let metrics = profile.metrics();
    let scale = profile.column(chart_metric).map(f64::abs).fold(0.0, f64::max);
    let mean = {
        let estimate: Mean = profile.column(chart_metric).collect();
        if estimate.is_empty() { 0.0 } else { estimate.mean() }
    };

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    let mut header = vec![Cell::new("Time")];
    header.extend(metrics.iter().map(|name| {
        let cell = Cell::new(metric::label(name));
        if *name == chart_metric { cell.add_attribute(Attribute::Bold) } else { cell }
    }));
    header.push(Cell::new("Samples"));
    header.push(Cell::new(metric::label(chart_metric)).add_attribute(Attribute::Bold));
    table.set_header(header);

    for (bucket, cells) in profile.rows() {
        let mut row = vec![Cell::new(bucket).add_attribute(Attribute::Dim)];
        row.extend(metrics.iter().map(|name| {
            cells.get(*name).map_or_else(
                || Cell::new("-").add_attribute(Attribute::Dim),
                |cell| Cell::new(format!("{:.3}", cell.mean)).set_alignment(CellAlignment::Right),
            )
        }));
        row.push(
            Cell::new(cells.get(chart_metric).map_or(0, |cell| cell.n_observations))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        );
        row.push(cells.get(chart_metric).map_or_else(
            || Cell::new(""),
            |cell| {
                let fraction = if scale > 0.0 { cell.mean.abs() / scale } else { 0.0 };
                Cell::new(bar(fraction, BAR_WIDTH)).fg(if cell.mean < 0.0 {
                    Color::Blue
                } else if cell.mean >= mean {
                    Color::Red
                } else {
                    Color::Green
                })
            },
        ));
        table.add_row(row);
    }
    table
}

/// Horizontal bar with the eighth-of-a-character resolution.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar(fraction: f64, width: usize) -> String {
    const PARTIALS: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];

    let eighths = (fraction.clamp(0.0, 1.0) * (width * 8) as f64).round() as usize;
    let mut bar = "█".repeat(eighths / 8);
    if eighths % 8 != 0 {
        bar.push(PARTIALS[eighths % 8]);
    }
    bar
}
