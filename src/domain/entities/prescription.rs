//! Prescriptions (`/recetas/avanzado`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{filter_fields, sort_columns, Entity, SortDir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(rename = "id_receta")]
    pub id: i64,
    #[serde(rename = "id_cliente")]
    pub customer_id: i64,
    #[serde(rename = "fecha_receta")]
    pub issued_on: NaiveDate,
    #[serde(rename = "profesional")]
    pub practitioner: Option<String>,
    #[serde(rename = "tipo_lente")]
    pub lens_kind: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
    #[serde(rename = "observaciones")]
    pub notes: Option<String>,
}

sort_columns! {
    pub enum PrescriptionSort {
        IdReceta => "id_receta",
        FechaReceta => "fecha_receta",
        Estado => "estado",
        TipoLente => "tipo_lente",
        Profesional => "profesional",
        ClienteApellido => "cliente_apellido",
        ClienteNombre => "cliente_nombre",
        Dni => "dni",
    }
}

filter_fields! {
    pub enum PrescriptionFilter {
        Estado => "estado": Text,
        TipoLente => "tipo_lente": Text,
        Profesional => "profesional": Text,
        IdCliente => "id_cliente": Int,
        Dni => "dni": Int,
        ActivoCliente => "activo_cliente": Bool,
        FechaDesde => "fecha_desde": Date,
        FechaHasta => "fecha_hasta": Date,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Prescriptions;

impl Entity for Prescriptions {
    type Item = Prescription;
    type Sort = PrescriptionSort;
    type Filter = PrescriptionFilter;

    const NAME: &'static str = "prescriptions";
    const ENDPOINT: &'static str = "/recetas/avanzado";
    const DEFAULT_SORT: PrescriptionSort = PrescriptionSort::FechaReceta;
    const DEFAULT_SORT_DIR: SortDir = SortDir::Desc;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{FilterField, FilterKind, FilterValue};

    #[test]
    fn joined_customer_columns_are_sortable() {
        assert_eq!(
            "cliente_apellido".parse::<PrescriptionSort>().unwrap(),
            PrescriptionSort::ClienteApellido
        );
    }

    #[test]
    fn filter_values_parse_by_declared_kind() {
        assert_eq!(
            PrescriptionFilter::ActivoCliente.parse_value("false").unwrap(),
            FilterValue::Bool(false)
        );
        assert_eq!(PrescriptionFilter::Profesional.kind(), FilterKind::Text);
        assert!(PrescriptionFilter::Dni.parse_value("12a").is_err());
    }
}
