//! Auxiliary sales book ("auxventas"): sales invoices reconciled against the bank payment
//! documents that settled them.

use crate::types::{ColumnOrder, MappedRow, RawRecord};

use super::RowMapper;
use super::fields::{amount_or_zero, format_date, free_text, integer_or_empty, text_or_empty};

/// Source columns selected by the sales query.
pub mod source {
    pub const INVOICE_DATE: &str = "fecha_factura";
    pub const INVOICE_NUMBER: &str = "nro_factura";
    pub const AUTHORIZATION_CODE: &str = "cod_autorizacion";
    pub const CUSTOMER_ID: &str = "nit_cliente";
    pub const CUSTOMER_NAME: &str = "razon_social";
    pub const INVOICE_TOTAL: &str = "importe_total";
    pub const PAID_AMOUNT: &str = "monto_pagado";
    pub const ACCOUNT_NUMBER: &str = "nro_cuenta";
    pub const BANK_ID: &str = "nit_entidad";
    pub const PAYMENT_DOCUMENT: &str = "nro_documento_pago";
    pub const PAYMENT_DOCUMENT_TYPE: &str = "tipo_documento_pago";
    pub const PAYMENT_DATE: &str = "fecha_pago";
    pub const ACCUMULATED_AMOUNT: &str = "monto_acumulado";

    pub const ALL: &[&str] = &[
        INVOICE_DATE,
        INVOICE_NUMBER,
        AUTHORIZATION_CODE,
        CUSTOMER_ID,
        CUSTOMER_NAME,
        INVOICE_TOTAL,
        PAID_AMOUNT,
        ACCOUNT_NUMBER,
        BANK_ID,
        PAYMENT_DOCUMENT,
        PAYMENT_DOCUMENT_TYPE,
        PAYMENT_DATE,
        ACCUMULATED_AMOUNT,
    ];
}

/// Report columns, in template order.
pub mod column {
    pub const NUMBER: &str = crate::mapping::NUMBER_COLUMN;
    pub const INVOICE_DATE: &str = "FECHA DE LA FACTURA";
    pub const INVOICE_NUMBER: &str = "NÚMERO DE FACTURA";
    pub const AUTHORIZATION_CODE: &str = "CÓDIGO DE AUTORIZACIÓN";
    pub const CUSTOMER_ID: &str = "NIT/CI CLIENTE";
    pub const CUSTOMER_NAME: &str = "NOMBRE O RAZÓN SOCIAL";
    pub const INVOICE_TOTAL: &str = "IMPORTE TOTAL DE LA VENTA";
    pub const PAID_AMOUNT: &str = "MONTO PAGADO";
    pub const ACCUMULATED_AMOUNT: &str = "MONTO ACUMULADO";
    pub const ACCOUNT_NUMBER: &str = "NÚMERO DE CUENTA";
    pub const BANK_ID: &str = "NIT ENTIDAD FINANCIERA";
    pub const PAYMENT_DOCUMENT: &str = "NÚMERO DE DOCUMENTO DE PAGO";
    pub const PAYMENT_DOCUMENT_TYPE: &str = "TIPO DE DOCUMENTO DE PAGO";
    pub const PAYMENT_DATE: &str = "FECHA DEL DOCUMENTO DE PAGO";
}

pub const SALES_COLUMNS: ColumnOrder = ColumnOrder::new(&[
    column::NUMBER,
    column::INVOICE_DATE,
    column::INVOICE_NUMBER,
    column::AUTHORIZATION_CODE,
    column::CUSTOMER_ID,
    column::CUSTOMER_NAME,
    column::INVOICE_TOTAL,
    column::PAID_AMOUNT,
    column::ACCUMULATED_AMOUNT,
    column::ACCOUNT_NUMBER,
    column::BANK_ID,
    column::PAYMENT_DOCUMENT,
    column::PAYMENT_DOCUMENT_TYPE,
    column::PAYMENT_DATE,
]);

/// Maps invoice/payment rows onto the auxiliary sales layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesMapper;

impl RowMapper for SalesMapper {
    fn name(&self) -> &'static str {
        "auxventas"
    }

    fn column_order(&self) -> ColumnOrder {
        SALES_COLUMNS
    }

    fn source_fields(&self) -> &'static [&'static str] {
        source::ALL
    }

    fn map_row(&self, position: usize, record: &RawRecord) -> MappedRow {
        let mut row = MappedRow::new();
        row.insert(column::NUMBER, position as i64);
        row.insert(column::INVOICE_DATE, format_date(record.get(source::INVOICE_DATE)));
        row.insert(column::INVOICE_NUMBER, integer_or_empty(record.get(source::INVOICE_NUMBER)));
        row.insert(
            column::AUTHORIZATION_CODE,
            text_or_empty(record.get(source::AUTHORIZATION_CODE)),
        );
        row.insert(column::CUSTOMER_ID, text_or_empty(record.get(source::CUSTOMER_ID)));
        row.insert(column::CUSTOMER_NAME, free_text(record.get(source::CUSTOMER_NAME)));
        row.insert(column::INVOICE_TOTAL, amount_or_zero(record.get(source::INVOICE_TOTAL)));
        row.insert(column::PAID_AMOUNT, amount_or_zero(record.get(source::PAID_AMOUNT)));
        row.insert(
            column::ACCUMULATED_AMOUNT,
            amount_or_zero(record.get(source::ACCUMULATED_AMOUNT)),
        );
        row.insert(column::ACCOUNT_NUMBER, text_or_empty(record.get(source::ACCOUNT_NUMBER)));
        row.insert(column::BANK_ID, text_or_empty(record.get(source::BANK_ID)));
        row.insert(
            column::PAYMENT_DOCUMENT,
            text_or_empty(record.get(source::PAYMENT_DOCUMENT)),
        );
        row.insert(
            column::PAYMENT_DOCUMENT_TYPE,
            integer_or_empty(record.get(source::PAYMENT_DOCUMENT_TYPE)),
        );
        row.insert(column::PAYMENT_DATE, format_date(record.get(source::PAYMENT_DATE)));
        row
    }
}
