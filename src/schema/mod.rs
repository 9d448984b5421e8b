//! Schema Registry - declared tables and their foreign-key graph
//!
//! Five tables, loaded parents-first:
//! - suppliers, customers (independent)
//! - products -> suppliers
//! - orders -> customers
//! - order_items -> orders, products

pub mod registry;
pub mod tables;
pub mod types;

pub use registry::SchemaRegistry;
pub use types::{Column, ColumnType, Entity, ForeignKey, TableSchema};
