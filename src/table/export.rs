use super::{Column, Record};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// RFC 4180 field encoding: quote when the value carries a comma, quote
/// or line break, doubling embedded quotes.
pub fn csv_field(field: &str) -> String {
    if needs_quoting(field) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// CSV of the given rows, header row first, CRLF-terminated records.
pub fn to_csv<R: Record>(rows: &[&R], columns: &[Column]) -> String {
    let mut output = String::new();
    let header: Vec<String> = columns
        .iter()
        .map(|column| csv_field(column.label))
        .collect();
    output.push_str(&header.join(","));
    output.push_str("\r\n");

    for record in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| csv_field(&record.field(column.key)))
            .collect();
        output.push_str(&cells.join(","));
        output.push_str("\r\n");
    }
    output
}

/// Pretty JSON array of the rows' full serde form, not just the visible
/// columns, so an export re-imports losslessly.
pub fn to_json<R: Record>(rows: &[&R]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Plain-text rendering of the rows with aligned columns. Stands in for
/// the print dialog; the caller decides which rows are "visible".
pub fn print_text<R: Record>(rows: &[&R], columns: &[Column], title: &str) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|column| column.label.len()).collect();
    let mut matrix: Vec<Vec<String>> = Vec::with_capacity(rows.len());
    for record in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| record.field(column.key))
            .collect();
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.len());
        }
        matrix.push(cells);
    }

    let mut output = String::new();
    output.push_str(title);
    output.push('\n');

    let header: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{:width$}", column.label, width = widths[index]))
        .collect();
    output.push_str(header.join("  ").trim_end());
    output.push('\n');
    output.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    output.push('\n');

    for cells in &matrix {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(index, cell)| format!("{:width$}", cell, width = widths[index]))
            .collect();
        output.push_str(line.join("  ").trim_end());
        output.push('\n');
    }
    output
}

/// Writes one export file under `dir`, timestamping the name so repeated
/// exports do not clobber each other.
pub fn write_export(dir: &Path, stem: &str, extension: &str, contents: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let name = format!(
        "{stem}-{}.{extension}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}
