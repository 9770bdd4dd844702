//! Back-office entities with an advanced-search listing.

pub mod customer;
pub mod lab_order;
pub mod prescription;
pub mod purchase;
pub mod supplier;
pub mod supply;

pub use customer::{Customer, CustomerFilter, CustomerSort, Customers};
pub use lab_order::{LabOrder, LabOrderFilter, LabOrderSort, LabOrders};
pub use prescription::{Prescription, PrescriptionFilter, PrescriptionSort, Prescriptions};
pub use purchase::{Purchase, PurchaseFilter, PurchaseSort, Purchases};
pub use supplier::{Supplier, SupplierFilter, SupplierSort, Suppliers};
pub use supply::{Supplies, Supply, SupplyFilter, SupplySort};
