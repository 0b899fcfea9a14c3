#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// A one-sheet template with a title row and a header row.
pub fn write_template(path: &Path, sheet: &str, header: &[&str]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet).unwrap();
    ws.write_string(0, 0, "REGISTRO DE BANCARIZACIÓN").unwrap();
    for (col, name) in header.iter().enumerate() {
        ws.write_string(1, col as u16, *name).unwrap();
    }
    wb.save(path).unwrap();
}

/// Writes `rows` (all text, empty strings left blank) to `sheet` of a new workbook.
pub fn write_text_sheet(path: &Path, sheet: &str, rows: &[&[&str]]) {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if !cell.is_empty() {
                ws.write_string(r as u32, c as u16, *cell).unwrap();
            }
        }
    }
    wb.save(path).unwrap();
}

/// Zips `files` (archive name, path on disk) into `zip_path`.
pub fn zip_files<P: AsRef<Path>>(zip_path: &Path, files: &[(&str, P)]) {
    let mut zip = ZipWriter::new(File::create(zip_path).unwrap());
    for (name, path) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(&std::fs::read(path.as_ref()).unwrap()).unwrap();
    }
    zip.finish().unwrap();
}

/// Every row of `sheet` (or the first sheet), as calamine reads it.
pub fn read_rows(path: &Path, sheet: Option<&str>) -> Vec<Vec<Data>> {
    let mut wb = open_workbook_auto(path).unwrap();
    let name = match sheet {
        Some(s) => s.to_string(),
        None => wb.sheet_names()[0].clone(),
    };
    let range = wb.worksheet_range(&name).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}
