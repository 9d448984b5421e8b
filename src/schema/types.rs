//! Entity and table declaration types

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The record types the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Supplier,
    Product,
    Customer,
    Order,
    OrderItem,
}

impl Entity {
    /// Get the string representation of the entity
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Supplier => "supplier",
            Entity::Product => "product",
            Entity::Customer => "customer",
            Entity::Order => "order",
            Entity::OrderItem => "order_item",
        }
    }

    /// Store table holding rows of this entity
    pub fn table_name(&self) -> &'static str {
        match self {
            Entity::Supplier => "suppliers",
            Entity::Product => "products",
            Entity::Customer => "customers",
            Entity::Order => "orders",
            Entity::OrderItem => "order_items",
        }
    }

    /// Get all entities in declaration order
    pub fn all() -> &'static [Entity] {
        &[
            Entity::Supplier,
            Entity::Product,
            Entity::Customer,
            Entity::Order,
            Entity::OrderItem,
        ]
    }
}

impl FromStr for Entity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "supplier" | "suppliers" => Ok(Entity::Supplier),
            "product" | "products" => Ok(Entity::Product),
            "customer" | "customers" => Ok(Entity::Customer),
            "order" | "orders" => Ok(Entity::Order),
            "order_item" | "order_items" | "orderitem" => Ok(Entity::OrderItem),
            _ => Err(Error::Schema(format!("Unknown entity: {}", s))),
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic type of a column; drives both DDL and value coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    /// Calendar date, `YYYY-MM-DD`, stored as TEXT so `strftime` works on it
    Date,
}

impl ColumnType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Date => "TEXT",
        }
    }
}

/// A declared column
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    /// Extra CHECK expression, e.g. `price >= 0`
    pub check: Option<&'static str>,
}

impl Column {
    /// Nullable column
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: true,
            check: None,
        }
    }

    /// NOT NULL column
    pub const fn required(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            nullable: false,
            check: None,
        }
    }

    pub const fn with_check(mut self, check: &'static str) -> Self {
        self.check = Some(check);
        self
    }
}

/// `column` references the primary key of `references`
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: Entity,
}

impl ForeignKey {
    pub const fn new(column: &'static str, references: Entity) -> Self {
        Self { column, references }
    }
}

/// Declaration of one entity's table
#[derive(Debug)]
pub struct TableSchema {
    pub entity: Entity,
    pub source_file: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableSchema {
    pub fn name(&self) -> &'static str {
        self.entity.table_name()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Entities this table references, without duplicates
    pub fn dependencies(&self) -> Vec<Entity> {
        let mut deps: Vec<Entity> = Vec::new();
        for fk in self.foreign_keys {
            if !deps.contains(&fk.references) {
                deps.push(fk.references);
            }
        }
        deps
    }
}
