mod common;

use bancarizacion::archive::filter::{CONCLUDED_MARKER, HEADER_MARKER, PENDING_MARKER};
use bancarizacion::archive::{ArchiveFilter, ArchiveRequest, extract_pending_contracts};
use bancarizacion::types::{RawRecord, Value};
use bancarizacion::ReportError;

use common::{init_tracing, write_text_sheet, zip_files};

const CONTRACTS_SHEET: &[&[&str]] = &[
    &["NRO", "PROVEEDOR", "ESTADO"],
    &[HEADER_MARKER, "", ""],
    &["C-001", "Proveedor A", PENDING_MARKER],
    &["C-002", "Proveedor B", CONCLUDED_MARKER],
    &["", "", ""],
    &[HEADER_MARKER, "", ""],
    &["C-003", "Proveedor C", PENDING_MARKER],
    &["C-004", "Proveedor D", "OBSERVADO"],
];

fn ids(records: &[RawRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get("NRO").and_then(Value::as_text))
        .collect()
}

#[test]
fn keeps_only_pending_contracts() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("Contratos.xlsx");
    let zip = dir.path().join("Contratos.zip");
    write_text_sheet(&xlsx, "Reporte", CONTRACTS_SHEET);
    zip_files(&zip, &[("reportes/Contratos.xlsx", &xlsx)]);

    let kept = extract_pending_contracts(&zip, &ArchiveRequest::default()).unwrap();

    assert_eq!(ids(&kept), vec!["C-001", "C-003"]);
    assert_eq!(
        kept[0].get("PROVEEDOR"),
        Some(&Value::Utf8("Proveedor A".to_string()))
    );
}

#[test]
fn status_column_restricts_marker_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("Contratos.xlsx");
    let zip = dir.path().join("Contratos.zip");
    write_text_sheet(
        &xlsx,
        "Reporte",
        &[
            &["NRO", "NOTA", "ESTADO"],
            &["C-010", PENDING_MARKER, "OBSERVADO"],
            &["C-011", "", PENDING_MARKER],
        ],
    );
    zip_files(&zip, &[("Contratos.xlsx", &xlsx)]);

    let request = ArchiveRequest {
        filter: ArchiveFilter::default().with_status_column("ESTADO"),
        ..ArchiveRequest::default()
    };
    let kept = extract_pending_contracts(&zip, &request).unwrap();
    assert_eq!(ids(&kept), vec!["C-011"]);
}

#[test]
fn falls_back_to_any_spreadsheet_in_the_archive() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("export.xlsx");
    let zip = dir.path().join("Contratos.zip");
    write_text_sheet(&xlsx, "Hoja1", CONTRACTS_SHEET);
    zip_files(&zip, &[("export_marzo.xlsx", &xlsx)]);

    let kept = extract_pending_contracts(&zip, &ArchiveRequest::default()).unwrap();
    assert_eq!(kept.len(), 2);
}

#[test]
fn missing_sheet_is_reported_with_available_names() {
    let dir = tempfile::tempdir().unwrap();
    let xlsx = dir.path().join("Contratos.xlsx");
    let zip = dir.path().join("Contratos.zip");
    write_text_sheet(&xlsx, "Reporte", CONTRACTS_SHEET);
    zip_files(&zip, &[("Contratos.xlsx", &xlsx)]);

    let request = ArchiveRequest {
        sheet: Some("Pendientes".to_string()),
        ..ArchiveRequest::default()
    };
    match extract_pending_contracts(&zip, &request).unwrap_err() {
        ReportError::SheetNotFound { sheet, available, .. } => {
            assert_eq!(sheet, "Pendientes");
            assert_eq!(available, vec!["Reporte".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn archive_without_spreadsheet_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("leeme.txt");
    std::fs::write(&notes, "sin planillas").unwrap();
    let zip = dir.path().join("Contratos.zip");
    zip_files(&zip, &[("leeme.txt", &notes)]);

    let err = extract_pending_contracts(&zip, &ArchiveRequest::default()).unwrap_err();
    assert!(matches!(err, ReportError::ArchiveEntryNotFound { .. }));
}

#[test]
fn missing_archive_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_pending_contracts(&dir.path().join("nope.zip"), &ArchiveRequest::default())
        .unwrap_err();
    assert!(matches!(err, ReportError::Io(_)));
}

#[test]
fn corrupt_archive_is_a_zip_error() {
    let dir = tempfile::tempdir().unwrap();
    let zip = dir.path().join("Contratos.zip");
    std::fs::write(&zip, b"not a zip file at all").unwrap();
    let err = extract_pending_contracts(&zip, &ArchiveRequest::default()).unwrap_err();
    assert!(matches!(err, ReportError::Zip(_)));
}

#[test]
fn extraction_dir_is_removed_on_success_and_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let scratch = dir.path().join("scratch");
    std::fs::create_dir(&scratch).unwrap();
    let xlsx = dir.path().join("Contratos.xlsx");
    let zip = dir.path().join("Contratos.zip");
    write_text_sheet(&xlsx, "Reporte", CONTRACTS_SHEET);
    zip_files(&zip, &[("Contratos.xlsx", &xlsx)]);
    let leftovers = || std::fs::read_dir(&scratch).unwrap().count();

    let ok = ArchiveRequest {
        scratch_dir: Some(scratch.clone()),
        ..ArchiveRequest::default()
    };
    assert_eq!(extract_pending_contracts(&zip, &ok).unwrap().len(), 2);
    assert_eq!(leftovers(), 0);

    let wrong_sheet = ArchiveRequest {
        sheet: Some("Pendientes".to_string()),
        ..ok.clone()
    };
    let err = extract_pending_contracts(&zip, &wrong_sheet).unwrap_err();
    assert!(matches!(err, ReportError::SheetNotFound { .. }));
    assert_eq!(leftovers(), 0);

    let wrong_entry = ArchiveRequest {
        workbook: "Contratos.xlsx".to_string(),
        ..ok.clone()
    };
    let notes = dir.path().join("leeme.txt");
    std::fs::write(&notes, "sin planillas").unwrap();
    let no_sheet_zip = dir.path().join("SinPlanilla.zip");
    zip_files(&no_sheet_zip, &[("leeme.txt", &notes)]);
    let err = extract_pending_contracts(&no_sheet_zip, &wrong_entry).unwrap_err();
    assert!(matches!(err, ReportError::ArchiveEntryNotFound { .. }));
    assert_eq!(leftovers(), 0);
}
