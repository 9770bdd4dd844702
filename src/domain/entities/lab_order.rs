//! Lab orders (`/pedidos-laboratorio/avanzado`).
//!
//! This endpoint returns its rows under `data`; the response decoder accepts
//! both names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, SortDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabOrder {
    #[serde(rename = "id_pedido_lab")]
    pub id: i64,
    #[serde(rename = "id_receta")]
    pub prescription_id: i64,
    #[serde(rename = "id_proveedor")]
    pub supplier_id: i64,
    #[serde(rename = "proveedor_nombre")]
    pub supplier_name: Option<String>,
    #[serde(rename = "fecha_envio")]
    pub sent_on: Option<NaiveDate>,
    #[serde(rename = "fecha_estimada_rec")]
    pub expected_on: Option<NaiveDate>,
    #[serde(rename = "fecha_recepcion")]
    pub received_on: Option<NaiveDate>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
    #[serde(rename = "nro_orden_lab")]
    pub lab_order_number: Option<String>,
    /// Number of supply lines on the order.
    #[serde(default)]
    pub items: u32,
}

sort_columns! {
    pub enum LabOrderSort {
        IdPedidoLab => "id_pedido_lab",
        FechaEnvio => "fecha_envio",
        FechaEstimadaRec => "fecha_estimada_rec",
        FechaRecepcion => "fecha_recepcion",
        Estado => "estado",
        NroOrdenLab => "nro_orden_lab",
        IdProveedor => "id_proveedor",
        IdReceta => "id_receta",
    }
}

filter_fields! {
    pub enum LabOrderFilter {
        /// Free text; the server matches it case-insensitively.
        Estado => "estado": Text,
        IdProveedor => "id_proveedor": Int,
        IdReceta => "id_receta": Int,
        FechaDesde => "fecha_desde": Date,
        FechaHasta => "fecha_hasta": Date,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LabOrders;

impl Entity for LabOrders {
    type Item = LabOrder;
    type Sort = LabOrderSort;
    type Filter = LabOrderFilter;

    const NAME: &'static str = "lab_orders";
    const ENDPOINT: &'static str = "/pedidos-laboratorio/avanzado";
    const DEFAULT_SORT: LabOrderSort = LabOrderSort::FechaEnvio;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Desc;
}
