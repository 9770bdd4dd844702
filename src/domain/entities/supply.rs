//! Supplies (`/insumos/avanzado`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, FilterValue, SortDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supply {
    #[serde(rename = "id_insumo")]
    pub id: i64,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo_insumo")]
    pub kind: Option<String>,
    #[serde(rename = "id_proveedor")]
    pub supplier_id: Option<i64>,
    #[serde(rename = "codigo_proveedor")]
    pub supplier_code: Option<String>,
    #[serde(rename = "codigo_interno")]
    pub internal_code: Option<String>,
    #[serde(rename = "precio_costo")]
    pub cost_price: Option<Decimal>,
    #[serde(rename = "precio_sugerido")]
    pub suggested_price: Option<Decimal>,
    #[serde(rename = "stock_minimo")]
    pub min_stock: Option<i64>,
    #[serde(rename = "stock_actual")]
    pub stock: Option<i64>,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

sort_columns! {
    pub enum SupplySort {
        Descripcion => "descripcion",
        TipoInsumo => "tipo_insumo",
        StockActual => "stock_actual",
        StockMinimo => "stock_minimo",
        PrecioCosto => "precio_costo",
        PrecioSugerido => "precio_sugerido",
        IdInsumo => "id_insumo",
        IdProveedor => "id_proveedor",
    }
}

filter_fields! {
    pub enum SupplyFilter {
        Activo => "activo": Bool,
        ProveedorId => "proveedor_id": Int,
        TipoInsumo => "tipo_insumo": Text,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Supplies;

impl Entity for Supplies {
    type Item = Supply;
    type Sort = SupplySort;
    type Filter = SupplyFilter;

    const NAME: &'static str = "supplies";
    const ENDPOINT: &'static str = "/insumos/avanzado";
    const DEFAULT_SORT: SupplySort = SupplySort::Descripcion;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Asc;

    fn default_filters() -> Vec<(SupplyFilter, FilterValue)> {
        vec![(SupplyFilter::Activo, FilterValue::Bool(true))]
    }
}
