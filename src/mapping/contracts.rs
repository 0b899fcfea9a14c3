//! SIAT contracts report ("contratos").

use crate::types::{Cell, ColumnOrder, MappedRow, RawRecord, Value};

use super::RowMapper;
use super::fields::{
    amount_or_empty, amount_or_zero, count_or_default, format_date, free_text, integer_or_empty,
    text_or_empty,
};

/// Source columns selected by the contracts query.
pub mod source {
    pub const CONTRACT_TYPE: &str = "tipo_contrato";
    pub const CONTRACT_NUMBER: &str = "nro_contrato";
    pub const CONTRACT_DATE: &str = "fecha_contrato";
    pub const MODALITY: &str = "modalidad";
    pub const COUNTERPART_ID: &str = "nit_contraparte";
    pub const COUNTERPART_NAME: &str = "razon_social";
    pub const DESCRIPTION: &str = "descripcion";
    pub const CONTRACT_AMOUNT: &str = "monto_contrato";
    pub const EXCHANGE_VALUE: &str = "valor_permuta";
    pub const INSTALLMENTS: &str = "nro_cuotas";
    pub const ACCUMULATED_AMOUNT: &str = "monto_acumulado";
    pub const TRANSACTION_DATE: &str = "fecha_transaccion";

    pub const ALL: &[&str] = &[
        CONTRACT_TYPE,
        CONTRACT_NUMBER,
        CONTRACT_DATE,
        MODALITY,
        COUNTERPART_ID,
        COUNTERPART_NAME,
        DESCRIPTION,
        CONTRACT_AMOUNT,
        EXCHANGE_VALUE,
        INSTALLMENTS,
        ACCUMULATED_AMOUNT,
        TRANSACTION_DATE,
    ];
}

/// Report columns, in template order.
pub mod column {
    pub const NUMBER: &str = crate::mapping::NUMBER_COLUMN;
    pub const CONTRACT_TYPE: &str = "TIPO DE CONTRATO O ACUERDO";
    pub const CONTRACT_NUMBER: &str = "NÚMERO CONTRATO O ACUERDO";
    pub const CONTRACT_DATE: &str = "FECHA CONTRATO O ACUERDO";
    pub const MODALITY: &str = "MODALIDAD DE TRANSACCIÓN";
    pub const COUNTERPART_ID: &str = "NIT/CI CONTRAPARTE";
    pub const COUNTERPART_NAME: &str = "RAZÓN SOCIAL O NOMBRE CONTRAPARTE";
    pub const DESCRIPTION: &str = "DESCRIPCIÓN DEL BIEN O SERVICIO";
    pub const CONTRACT_AMOUNT: &str = "MONTO TOTAL DEL CONTRATO";
    pub const EXCHANGE_VALUE: &str = "VALOR DE LA PERMUTA";
    pub const INSTALLMENTS: &str = "NÚMERO DE CUOTAS";
    pub const ACCUMULATED_AMOUNT: &str = "MONTO ACUMULADO";
    pub const TRANSACTION_DATE: &str = "FECHA DE LA TRANSACCIÓN";
}

pub const CONTRACT_COLUMNS: ColumnOrder = ColumnOrder::new(&[
    column::NUMBER,
    column::CONTRACT_TYPE,
    column::CONTRACT_NUMBER,
    column::CONTRACT_DATE,
    column::MODALITY,
    column::COUNTERPART_ID,
    column::COUNTERPART_NAME,
    column::DESCRIPTION,
    column::CONTRACT_AMOUNT,
    column::EXCHANGE_VALUE,
    column::INSTALLMENTS,
    column::ACCUMULATED_AMOUNT,
    column::TRANSACTION_DATE,
]);

/// Contract type code for verbal agreements. Verbal agreements carry no contract number.
pub const VERBAL_CONTRACT_TYPE: i64 = 2;

/// Maps contract rows onto the SIAT contracts layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractMapper;

impl ContractMapper {
    fn is_verbal(record: &RawRecord) -> bool {
        record
            .get(source::CONTRACT_TYPE)
            .and_then(Value::as_i64)
            .is_some_and(|t| t == VERBAL_CONTRACT_TYPE)
    }
}

impl RowMapper for ContractMapper {
    fn name(&self) -> &'static str {
        "contratos"
    }

    fn column_order(&self) -> ColumnOrder {
        CONTRACT_COLUMNS
    }

    fn source_fields(&self) -> &'static [&'static str] {
        source::ALL
    }

    fn map_row(&self, position: usize, record: &RawRecord) -> MappedRow {
        let contract_number = if Self::is_verbal(record) {
            Cell::Empty
        } else {
            text_or_empty(record.get(source::CONTRACT_NUMBER))
        };

        let mut row = MappedRow::new();
        row.insert(column::NUMBER, position as i64);
        row.insert(column::CONTRACT_TYPE, integer_or_empty(record.get(source::CONTRACT_TYPE)));
        row.insert(column::CONTRACT_NUMBER, contract_number);
        row.insert(column::CONTRACT_DATE, format_date(record.get(source::CONTRACT_DATE)));
        row.insert(column::MODALITY, integer_or_empty(record.get(source::MODALITY)));
        row.insert(column::COUNTERPART_ID, text_or_empty(record.get(source::COUNTERPART_ID)));
        row.insert(column::COUNTERPART_NAME, free_text(record.get(source::COUNTERPART_NAME)));
        row.insert(column::DESCRIPTION, free_text(record.get(source::DESCRIPTION)));
        row.insert(column::CONTRACT_AMOUNT, amount_or_zero(record.get(source::CONTRACT_AMOUNT)));
        row.insert(column::EXCHANGE_VALUE, amount_or_empty(record.get(source::EXCHANGE_VALUE)));
        row.insert(column::INSTALLMENTS, count_or_default(record.get(source::INSTALLMENTS), 1));
        row.insert(
            column::ACCUMULATED_AMOUNT,
            amount_or_zero(record.get(source::ACCUMULATED_AMOUNT)),
        );
        row.insert(
            column::TRANSACTION_DATE,
            format_date(record.get(source::TRANSACTION_DATE)),
        );
        row
    }
}
