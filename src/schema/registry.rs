//! Schema registry and dependency graph
//!
//! Tables form a directed acyclic graph where an edge `parent -> child`
//! means `child` holds a foreign key into `parent`. The load order is a
//! topological sort of that graph; drops walk it backwards.

use std::collections::{HashMap, VecDeque};
use crate::{Error, Result};
use super::tables::ALL_TABLES;
use super::types::{Entity, TableSchema};

/// The set of declared tables plus their computed load order.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    tables: Vec<&'static TableSchema>,
    load_order: Vec<Entity>,
}

impl SchemaRegistry {
    /// Build a registry, validating references and computing the load order.
    pub fn new(tables: Vec<&'static TableSchema>) -> Result<Self> {
        let mut seen: Vec<Entity> = Vec::with_capacity(tables.len());
        for table in &tables {
            if seen.contains(&table.entity) {
                return Err(Error::Schema(format!("{} declared twice", table.entity)));
            }
            if table.column(table.primary_key).is_none() {
                return Err(Error::Schema(format!(
                    "{}: primary key {} is not a declared column",
                    table.name(),
                    table.primary_key
                )));
            }
            seen.push(table.entity);
        }

        for table in &tables {
            for fk in table.foreign_keys {
                if table.column(fk.column).is_none() {
                    return Err(Error::Schema(format!(
                        "{}: foreign key column {} is not declared",
                        table.name(),
                        fk.column
                    )));
                }
                if !seen.contains(&fk.references) {
                    return Err(Error::Schema(format!(
                        "{}.{} references undeclared entity {}",
                        table.name(),
                        fk.column,
                        fk.references
                    )));
                }
            }
        }

        let load_order = topological_order(&tables)?;
        Ok(Self { tables, load_order })
    }

    /// Registry for the five e-commerce tables
    pub fn standard() -> Result<Self> {
        Self::new(ALL_TABLES.to_vec())
    }

    pub fn get(&self, entity: Entity) -> Option<&'static TableSchema> {
        self.tables.iter().copied().find(|t| t.entity == entity)
    }

    /// Tables in declaration order
    pub fn tables(&self) -> &[&'static TableSchema] {
        &self.tables
    }

    /// Entities ordered so every reference target precedes its referrers
    pub fn load_order(&self) -> &[Entity] {
        &self.load_order
    }

    /// Children before parents, for dropping
    pub fn drop_order(&self) -> Vec<Entity> {
        self.load_order.iter().rev().copied().collect()
    }

    /// Tables in load order
    pub fn ordered_tables(&self) -> Vec<&'static TableSchema> {
        self.load_order
            .iter()
            .filter_map(|e| self.get(*e))
            .collect()
    }

    /// Render the CREATE TABLE statement for a registered table
    pub fn create_table_sql(&self, table: &TableSchema) -> Result<String> {
        let mut lines: Vec<String> = Vec::new();

        for column in table.columns {
            let mut line = format!("    {} {}", column.name, column.ty.sql_type());
            if column.name == table.primary_key {
                line.push_str(" PRIMARY KEY");
            }
            if !column.nullable {
                line.push_str(" NOT NULL");
            }
            if let Some(check) = column.check {
                line.push_str(&format!(" CHECK ({})", check));
            }
            lines.push(line);
        }

        for fk in table.foreign_keys {
            let parent = self.get(fk.references).ok_or_else(|| {
                Error::Schema(format!("{} is not registered", fk.references))
            })?;
            lines.push(format!(
                "    FOREIGN KEY ({}) REFERENCES {}({})",
                fk.column,
                parent.name(),
                parent.primary_key
            ));
        }

        Ok(format!("CREATE TABLE {} (\n{}\n)", table.name(), lines.join(",\n")))
    }
}

/// Kahn's algorithm. Ready tables are taken first-in first-out, seeded in
/// declaration order, so independent tables load before their dependents.
fn topological_order(tables: &[&'static TableSchema]) -> Result<Vec<Entity>> {
    let mut in_degree: HashMap<Entity, usize> = HashMap::new();
    let mut children: HashMap<Entity, Vec<Entity>> = HashMap::new();

    for table in tables {
        let deps = table.dependencies();
        in_degree.insert(table.entity, deps.len());
        for parent in deps {
            children.entry(parent).or_default().push(table.entity);
        }
    }

    let mut ready: VecDeque<Entity> = tables
        .iter()
        .map(|t| t.entity)
        .filter(|e| in_degree.get(e) == Some(&0))
        .collect();

    let mut order = Vec::with_capacity(tables.len());
    while let Some(entity) = ready.pop_front() {
        order.push(entity);
        for child in children.get(&entity).map(Vec::as_slice).unwrap_or_default() {
            if let Some(degree) = in_degree.get_mut(child) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(*child);
                }
            }
        }
    }

    if order.len() != tables.len() {
        let stuck: Vec<&str> = tables
            .iter()
            .map(|t| t.entity)
            .filter(|e| !order.contains(e))
            .map(|e| e.table_name())
            .collect();
        return Err(Error::Schema(format!(
            "foreign keys form a cycle among: {}",
            stuck.join(", ")
        )));
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{Column, ColumnType, ForeignKey};
    use crate::schema::tables::{CUSTOMERS, ORDERS, ORDER_ITEMS, PRODUCTS, SUPPLIERS};

    fn position(order: &[Entity], entity: Entity) -> usize {
        order.iter().position(|e| *e == entity).unwrap()
    }

    #[test]
    fn test_standard_load_order() {
        let registry = SchemaRegistry::new(ALL_TABLES.to_vec()).unwrap();
        assert_eq!(
            registry.load_order(),
            &[
                Entity::Supplier,
                Entity::Customer,
                Entity::Product,
                Entity::Order,
                Entity::OrderItem,
            ]
        );
    }

    #[test]
    fn test_drop_order_is_reversed() {
        let registry = SchemaRegistry::standard().unwrap();
        let drops = registry.drop_order();
        assert_eq!(drops.first(), Some(&Entity::OrderItem));
        assert_eq!(drops.last(), Some(&Entity::Supplier));
    }

    #[test]
    fn test_order_independent_of_declaration_order() {
        let registry =
            SchemaRegistry::new(vec![&ORDER_ITEMS, &ORDERS, &PRODUCTS, &CUSTOMERS, &SUPPLIERS])
                .unwrap();
        let order = registry.load_order();
        for table in registry.tables() {
            for fk in table.foreign_keys {
                assert!(position(order, fk.references) < position(order, table.entity));
            }
        }
        assert_eq!(order.last(), Some(&Entity::OrderItem));
    }

    static RETURNS: TableSchema = TableSchema {
        entity: Entity::Supplier,
        source_file: "returns.csv",
        primary_key: "supplier_id",
        columns: &[Column::required("supplier_id", ColumnType::Integer)],
        foreign_keys: &[],
    };

    #[test]
    fn test_duplicate_entity_rejected() {
        let err = SchemaRegistry::new(vec![&SUPPLIERS, &RETURNS]).unwrap_err();
        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn test_missing_parent_rejected() {
        let err = SchemaRegistry::new(vec![&PRODUCTS]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    static CYCLIC_A: TableSchema = TableSchema {
        entity: Entity::Customer,
        source_file: "a.csv",
        primary_key: "id",
        columns: &[
            Column::required("id", ColumnType::Integer),
            Column::required("supplier_id", ColumnType::Integer),
        ],
        foreign_keys: &[ForeignKey::new("supplier_id", Entity::Supplier)],
    };

    static CYCLIC_B: TableSchema = TableSchema {
        entity: Entity::Supplier,
        source_file: "b.csv",
        primary_key: "id",
        columns: &[
            Column::required("id", ColumnType::Integer),
            Column::required("customer_id", ColumnType::Integer),
        ],
        foreign_keys: &[ForeignKey::new("customer_id", Entity::Customer)],
    };

    #[test]
    fn test_cycle_rejected() {
        let err = SchemaRegistry::new(vec![&CYCLIC_A, &CYCLIC_B]).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_create_table_sql() {
        let registry = SchemaRegistry::standard().unwrap();
        let sql = registry.create_table_sql(&ORDER_ITEMS).unwrap();
        assert!(sql.starts_with("CREATE TABLE order_items ("));
        assert!(sql.contains("order_item_id INTEGER PRIMARY KEY NOT NULL"));
        assert!(sql.contains("CHECK (quantity >= 1)"));
        assert!(sql.contains("FOREIGN KEY (order_id) REFERENCES orders(order_id)"));
        assert!(sql.contains("FOREIGN KEY (product_id) REFERENCES products(product_id)"));
    }
}
