//! Customers (`/clientes/avanzado`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, FilterValue, SortDir};

/// One customer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "id_cliente")]
    pub id: i64,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    pub dni: i64,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "observaciones")]
    pub notes: Option<String>,
    #[serde(rename = "fecha_alta")]
    pub registered_on: Option<NaiveDate>,
    #[serde(rename = "activo", default)]
    pub active: bool,
}

sort_columns! {
    pub enum CustomerSort {
        Dni => "dni",
        Nombre => "nombre",
        Apellido => "apellido",
        FechaAlta => "fecha_alta",
    }
}

filter_fields! {
    pub enum CustomerFilter {
        Dni => "dni": Int,
        Activo => "activo": Bool,
        FechaDesde => "fecha_desde": Date,
        FechaHasta => "fecha_hasta": Date,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Customers;

impl Entity for Customers {
    type Item = Customer;
    type Sort = CustomerSort;
    type Filter = CustomerFilter;

    const NAME: &'static str = "customers";
    const ENDPOINT: &'static str = "/clientes/avanzado";
    const DEFAULT_SORT: CustomerSort = CustomerSort::Apellido;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Asc;

    fn default_filters() -> Vec<(CustomerFilter, FilterValue)> {
        vec![(CustomerFilter::Activo, FilterValue::Bool(true))]
    }
}
