//! Supply purchases (`/compras-insumos/avanzado`).

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, SortDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "id_compra")]
    pub id: i64,
    #[serde(rename = "id_proveedor")]
    pub supplier_id: i64,
    #[serde(rename = "fecha_compra")]
    pub purchased_on: NaiveDate,
    #[serde(rename = "tipo_comprobante")]
    pub voucher_kind: Option<String>,
    #[serde(rename = "nro_comprobante")]
    pub voucher_number: Option<String>,
    #[serde(rename = "observaciones")]
    pub notes: Option<String>,
    #[serde(rename = "monto_total")]
    pub total_amount: Option<Decimal>,
    #[serde(rename = "anulada", default)]
    pub voided: bool,
    #[serde(rename = "motivo_anulacion")]
    pub void_reason: Option<String>,
    #[serde(rename = "fecha_anulacion")]
    pub voided_at: Option<NaiveDateTime>,
}

sort_columns! {
    pub enum PurchaseSort {
        IdCompra => "id_compra",
        FechaCompra => "fecha_compra",
        MontoTotal => "monto_total",
        IdProveedor => "id_proveedor",
        Anulada => "anulada",
    }
}

filter_fields! {
    pub enum PurchaseFilter {
        IdProveedor => "id_proveedor": Int,
        Anulada => "anulada": Bool,
        FechaDesde => "fecha_desde": Date,
        FechaHasta => "fecha_hasta": Date,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Purchases;

impl Entity for Purchases {
    type Item = Purchase;
    type Sort = PurchaseSort;
    type Filter = PurchaseFilter;

    const NAME: &'static str = "purchases";
    const ENDPOINT: &'static str = "/compras-insumos/avanzado";
    const DEFAULT_SORT: PurchaseSort = PurchaseSort::FechaCompra;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Desc;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_voided_purchase() {
        let row: Purchase = serde_json::from_str(
            r#"{"id_compra": 41, "id_proveedor": 3, "fecha_compra": "2024-05-02",
                "monto_total": 20500.0, "anulada": true, "motivo_anulacion": "duplicada",
                "fecha_anulacion": "2024-05-03T10:15:00"}"#,
        )
        .unwrap();
        assert!(row.voided);
        assert_eq!(row.void_reason.as_deref(), Some("duplicada"));
        assert!(row.voided_at.is_some());
    }

    #[test]
    fn has_no_default_filters() {
        assert!(Purchases::default_filters().is_empty());
    }
}
