//! Storage Layer - SQLite-backed relational store
//!
//! Tables are generated from the schema registry:
//! - suppliers, customers
//! - products(supplier_id -> suppliers)
//! - orders(customer_id -> customers)
//! - order_items(order_id -> orders, product_id -> products)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, RowValues, TotalMismatch, DbStats, TableStat};
