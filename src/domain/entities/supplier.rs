//! Suppliers (`/proveedores/avanzado`).

use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, FilterValue, SortDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(rename = "id_proveedor")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

sort_columns! {
    pub enum SupplierSort {
        IdProveedor => "id_proveedor",
        Nombre => "nombre",
        Telefono => "telefono",
        Email => "email",
        Direccion => "direccion",
        Activo => "activo",
    }
}

filter_fields! {
    pub enum SupplierFilter {
        Activo => "activo": Bool,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Suppliers;

impl Entity for Suppliers {
    type Item = Supplier;
    type Sort = SupplierSort;
    type Filter = SupplierFilter;

    const NAME: &'static str = "suppliers";
    const ENDPOINT: &'static str = "/proveedores/avanzado";
    const DEFAULT_SORT: SupplierSort = SupplierSort::Nombre;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Asc;

    fn default_filters() -> Vec<(SupplierFilter, FilterValue)> {
        vec![(SupplierFilter::Activo, FilterValue::Bool(true))]
    }
}
