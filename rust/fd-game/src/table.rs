//! Text rendering of the pairwise win-probability table shown by the help entry.

use fd_core::{compare, matchups, DiceSet};

/// Header of the row-label column.
pub const CORNER: &str = "User dice v";

/// Rows are the user's die, columns the computer's; each cell is the chance
/// that the row die shows a strictly higher face. The diagonal is marked `-`
/// with the die's odds against an identical copy of itself.
pub fn render_probability_table(set: &DiceSet, precision: usize) -> String {
    let labels: Vec<String> = set.iter().map(|d| d.to_string()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(set.len());
    for (i, die) in set.iter().enumerate() {
        let mut cells = vec![String::new(); set.len()];
        cells[i] = format!("- ({:.*})", precision, compare(die, die).win());
        for (j, _, odds) in matchups(set, i).into_iter().flatten() {
            cells[j] = format!("{:.*}", precision, odds.win());
        }
        rows.push(cells);
    }

    let mut widths = Vec::with_capacity(set.len() + 1);
    widths.push(
        labels
            .iter()
            .map(String::len)
            .chain(std::iter::once(CORNER.len()))
            .max()
            .unwrap_or(CORNER.len()),
    );
    for (j, label) in labels.iter().enumerate() {
        let w = rows.iter().map(|r| r[j].len()).max().unwrap_or(0);
        widths.push(w.max(label.len()));
    }

    let sep = separator(&widths);
    let mut out = String::new();
    out.push_str(&sep);
    out.push_str(&line(&widths, CORNER, &labels));
    out.push_str(&sep);
    for (label, cells) in labels.iter().zip(&rows) {
        out.push_str(&line(&widths, label, cells));
    }
    out.push_str(&sep);
    out
}

fn separator(widths: &[usize]) -> String {
    let mut s = String::from("+");
    for w in widths {
        s.push_str(&"-".repeat(w + 2));
        s.push('+');
    }
    s.push('\n');
    s
}

fn line(widths: &[usize], first: &str, cells: &[String]) -> String {
    let mut s = format!("| {:<w$} |", first, w = widths[0]);
    for (cell, w) in cells.iter().zip(&widths[1..]) {
        s.push_str(&format!(" {:<w$} |", cell, w = *w));
    }
    s.push('\n');
    s
}
