mod common;

use bancarizacion::mapping::contracts::{CONTRACT_COLUMNS, source};
use bancarizacion::mapping::{ContractMapper, map_records};
use bancarizacion::report::populate_template;
use bancarizacion::types::{RawRecord, Value};
use bancarizacion::ReportError;
use calamine::{Data, Dimensions, Reader, Xlsx, open_workbook};
use chrono::NaiveDate;

use common::{init_tracing, read_rows, write_template};
use rust_xlsxwriter::{Format, Workbook};

fn contract(number: &str, contract_type: i64) -> RawRecord {
    RawRecord::from_pairs([
        (source::CONTRACT_TYPE, Value::Int64(contract_type)),
        (source::CONTRACT_NUMBER, Value::from(number)),
        (
            source::CONTRACT_DATE,
            Value::Date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()),
        ),
        (source::MODALITY, Value::Int64(1)),
        (source::COUNTERPART_ID, Value::Int64(1_020_304_025)),
        (source::COUNTERPART_NAME, Value::from("Constructora Andina S.R.L.")),
        (source::DESCRIPTION, Value::from("Provisión de cemento")),
        (source::CONTRACT_AMOUNT, Value::from("125000.50")),
        (source::EXCHANGE_VALUE, Value::Null),
        (source::INSTALLMENTS, Value::Int64(3)),
        (source::ACCUMULATED_AMOUNT, Value::Float64(50000.0)),
        (
            source::TRANSACTION_DATE,
            Value::Date(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()),
        ),
    ])
}

#[test]
fn appends_mapped_rows_below_template_header() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    let destination = dir.path().join("salida").join("Contratos_SIAT.xlsx");
    write_template(&template, "Hoja1", CONTRACT_COLUMNS.names().collect::<Vec<_>>().as_slice());

    let rows = map_records(&ContractMapper, &[contract("CT-14", 1)]).unwrap();
    let summary = populate_template(&rows, &template, &destination, &CONTRACT_COLUMNS, None).unwrap();

    assert_eq!(summary.sheet, "Hoja1");
    assert_eq!(summary.template_rows, 2);
    assert_eq!(summary.appended_rows, 1);
    assert!(destination.is_file(), "destination directory is created");

    let out = read_rows(&destination, Some("Hoja1"));
    assert_eq!(out.len(), 3);
    assert_eq!(out[0][0], Data::String("REGISTRO DE BANCARIZACIÓN".to_string()));
    assert_eq!(out[1][0], Data::String("N°".to_string()));
    assert_eq!(out[1][1], Data::String("TIPO DE CONTRATO O ACUERDO".to_string()));

    let data = &out[2];
    assert_eq!(data[0], Data::Float(1.0));
    assert_eq!(data[1], Data::Float(1.0));
    assert_eq!(data[2], Data::String("CT-14".to_string()));
    assert_eq!(data[3], Data::String("15/03/2025".to_string()));
    assert_eq!(data[4], Data::Float(1.0));
    assert_eq!(data[5], Data::String("1020304025".to_string()));
    assert_eq!(data[6], Data::String("Constructora Andina S.R.L.".to_string()));
    assert_eq!(data[7], Data::String("Provisión de cemento".to_string()));
    assert_eq!(data[8], Data::Float(125000.5));
    assert_eq!(data[9], Data::Empty, "missing exchange value stays empty");
    assert_eq!(data[10], Data::Float(3.0));
    assert_eq!(data[11], Data::Float(50000.0));
    assert_eq!(data[12], Data::String("02/04/2025".to_string()));
}

#[test]
fn template_file_is_never_modified() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    let destination = dir.path().join("out.xlsx");
    write_template(&template, "Hoja1", &["N°", "TIPO DE CONTRATO O ACUERDO"]);
    let before = std::fs::read(&template).unwrap();

    let records: Vec<RawRecord> = (1..=4).map(|i| contract(&format!("CT-{i}"), 1)).collect();
    let rows = map_records(&ContractMapper, &records).unwrap();
    populate_template(&rows, &template, &destination, &CONTRACT_COLUMNS, None).unwrap();

    assert_eq!(std::fs::read(&template).unwrap(), before);
    assert_eq!(read_rows(&destination, None).len(), 2 + 4);
    assert_eq!(read_rows(&template, None).len(), 2);
}

#[test]
fn verbal_contracts_leave_number_blank() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    let destination = dir.path().join("out.xlsx");
    write_template(&template, "Hoja1", &["N°"]);

    let rows = map_records(&ContractMapper, &[contract("CT-1", 1), contract("VERBAL", 2)]).unwrap();
    populate_template(&rows, &template, &destination, &CONTRACT_COLUMNS, None).unwrap();

    let out = read_rows(&destination, None);
    assert_eq!(out[2][2], Data::String("CT-1".to_string()));
    assert_eq!(out[3][0], Data::Float(2.0));
    assert_eq!(out[3][2], Data::Empty);
}

#[test]
fn existing_destination_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    let destination = dir.path().join("out.xlsx");
    write_template(&template, "Hoja1", &["N°"]);
    std::fs::write(&destination, b"previous run").unwrap();

    let rows = map_records(&ContractMapper, &[contract("CT-1", 1)]).unwrap();
    let err = populate_template(&rows, &template, &destination, &CONTRACT_COLUMNS, None).unwrap_err();

    assert!(matches!(err, ReportError::Persist { .. }));
    assert_eq!(std::fs::read(&destination).unwrap(), b"previous run");
}

#[test]
fn unknown_target_sheet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    write_template(&template, "Hoja1", &["N°"]);

    let err = populate_template(
        &[],
        &template,
        &dir.path().join("out.xlsx"),
        &CONTRACT_COLUMNS,
        Some("Contratos"),
    )
    .unwrap_err();

    match err {
        ReportError::SheetNotFound { sheet, available, .. } => {
            assert_eq!(sheet, "Contratos");
            assert_eq!(available, vec!["Hoja1".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn formulas_merges_and_other_sheets_survive() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("Contratos.xlsx");
    let destination = dir.path().join("out.xlsx");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Hoja1").unwrap();
    ws.merge_range(0, 0, 0, 5, "REGISTRO DE BANCARIZACIÓN", &Format::new().set_bold())
        .unwrap();
    ws.write_formula(1, 0, "=CONCATENATE(\"N\",\"°\")").unwrap();
    ws.write_string(1, 1, "TIPO DE CONTRATO O ACUERDO").unwrap();
    ws.set_column_width(1, 40).unwrap();
    let notes = wb.add_worksheet();
    notes.set_name("Instrucciones").unwrap();
    notes.write_string(0, 0, "No modificar los encabezados").unwrap();
    wb.save(&template).unwrap();

    let rows = map_records(&ContractMapper, &[contract("CT-14", 1)]).unwrap();
    let summary = populate_template(&rows, &template, &destination, &CONTRACT_COLUMNS, None).unwrap();
    assert_eq!(summary.template_rows, 2);

    let mut out: Xlsx<_> = open_workbook(&destination).unwrap();

    let formulas = out.worksheet_formula("Hoja1").unwrap();
    assert_eq!(
        formulas.get_value((1, 0)).map(String::as_str),
        Some("CONCATENATE(\"N\",\"°\")")
    );

    let merged = out.worksheet_merge_cells("Hoja1").unwrap().unwrap();
    assert!(merged.contains(&Dimensions::new((0, 0), (0, 5))), "{merged:?}");

    let values = out.worksheet_range("Hoja1").unwrap();
    assert_eq!(values.get_value((2, 2)), Some(&Data::String("CT-14".to_string())));

    let notes = out.worksheet_range("Instrucciones").unwrap();
    assert_eq!(
        notes.get_value((0, 0)),
        Some(&Data::String("No modificar los encabezados".to_string()))
    );
}
