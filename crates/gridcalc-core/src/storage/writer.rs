//! Writer for .grd file format

use gridcalc_engine::engine::CellRef;

/// Write raw cells to .grd format, skipping empty cells.
///
/// Cells are written in the order given; callers pass them row-major.
pub fn write_grd_content<'a>(
    cells: impl IntoIterator<Item = (&'a CellRef, &'a String)>,
) -> String {
    let mut lines = vec!["# Gridcalc Sheet".to_string()];

    for (cell_ref, raw) in cells {
        if raw.is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", cell_ref, format_raw_value(raw)));
    }

    lines.join("\n") + "\n"
}

/// Quote a raw value when writing it bare would not read back the same.
fn format_raw_value(raw: &str) -> String {
    let needs_quotes =
        raw.trim() != raw || raw.starts_with('"') || raw.contains('\n') || raw.contains('\r');
    if needs_quotes {
        format!("\"{}\"", escape_grd_text(raw))
    } else {
        raw.to_string()
    }
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
