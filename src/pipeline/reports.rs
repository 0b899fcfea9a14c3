//! Report definitions: query, template and mapper per database pipeline.

use crate::mapping::{ContractMapper, RowMapper, SalesMapper};

/// A database report filled into a SIAT template.
#[derive(Clone, Copy)]
pub struct TemplateReport {
    /// Template file name under the templates directory.
    pub template_file: &'static str,
    /// `SELECT` with two positional parameters: period start (inclusive) and the day after the
    /// period (exclusive). See [`ReportPeriod::params`](crate::pipeline::ReportPeriod::params).
    pub query: &'static str,
    pub mapper: &'static dyn RowMapper,
}

pub const CONTRACTS_REPORT: TemplateReport = TemplateReport {
    template_file: "Contratos.xlsx",
    query: "SELECT c.tipo_contrato, c.nro_contrato, c.fecha_contrato, c.modalidad, \
            c.nit_contraparte, c.razon_social, c.descripcion, c.monto_contrato, \
            c.valor_permuta, c.nro_cuotas, c.monto_acumulado, c.fecha_transaccion \
            FROM contratos c \
            WHERE c.fecha_transaccion >= ? AND c.fecha_transaccion < ? \
            ORDER BY c.fecha_transaccion, c.nro_contrato",
    mapper: &ContractMapper,
};

pub const SALES_REPORT: TemplateReport = TemplateReport {
    template_file: "AuxVentas.xlsx",
    query: "SELECT v.fecha_factura, v.nro_factura, v.cod_autorizacion, v.nit_cliente, \
            v.razon_social, v.importe_total, p.monto_pagado, p.monto_acumulado, \
            p.nro_cuenta, p.nit_entidad, p.nro_documento_pago, p.tipo_documento_pago, \
            p.fecha_pago \
            FROM ventas v \
            JOIN pagos_venta p ON p.venta_id = v.id \
            WHERE v.fecha_factura >= ? AND v.fecha_factura < ? \
            ORDER BY v.fecha_factura, v.nro_factura",
    mapper: &SalesMapper,
};

/// Output name and sheet of the archive report.
pub const ARCHIVE_REPORT_NAME: &str = "contratos_pendientes";
pub const ARCHIVE_REPORT_SHEET: &str = "Pendientes";
