//! Table declarations for the e-commerce model

use super::types::*;

// =============================================================================
// Independent tables
// =============================================================================

pub static SUPPLIERS: TableSchema = TableSchema {
    entity: Entity::Supplier,
    source_file: "suppliers.csv",
    primary_key: "supplier_id",
    columns: &[
        Column::required("supplier_id", ColumnType::Integer),
        Column::required("supplier_name", ColumnType::Text),
        Column::new("contact_email", ColumnType::Text),
        Column::new("phone", ColumnType::Text),
        Column::new("address", ColumnType::Text),
        Column::new("city", ColumnType::Text),
        Column::new("state", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static CUSTOMERS: TableSchema = TableSchema {
    entity: Entity::Customer,
    source_file: "customers.csv",
    primary_key: "customer_id",
    columns: &[
        Column::required("customer_id", ColumnType::Integer),
        Column::required("first_name", ColumnType::Text),
        Column::required("last_name", ColumnType::Text),
        Column::new("email", ColumnType::Text),
        Column::new("phone", ColumnType::Text),
        Column::new("address", ColumnType::Text),
        Column::new("city", ColumnType::Text),
        Column::new("state", ColumnType::Text),
        Column::new("zip_code", ColumnType::Text),
        Column::new("registration_date", ColumnType::Date),
    ],
    foreign_keys: &[],
};

// =============================================================================
// Dependent tables
// =============================================================================

pub static PRODUCTS: TableSchema = TableSchema {
    entity: Entity::Product,
    source_file: "products.csv",
    primary_key: "product_id",
    columns: &[
        Column::required("product_id", ColumnType::Integer),
        Column::required("product_name", ColumnType::Text),
        Column::new("category", ColumnType::Text),
        Column::new("price", ColumnType::Real).with_check("price >= 0"),
        Column::new("stock_quantity", ColumnType::Integer).with_check("stock_quantity >= 0"),
        Column::new("description", ColumnType::Text),
        Column::required("supplier_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("supplier_id", Entity::Supplier)],
};

pub static ORDERS: TableSchema = TableSchema {
    entity: Entity::Order,
    source_file: "orders.csv",
    primary_key: "order_id",
    columns: &[
        Column::required("order_id", ColumnType::Integer),
        Column::required("customer_id", ColumnType::Integer),
        Column::required("order_date", ColumnType::Date),
        Column::new("total_amount", ColumnType::Real),
        Column::required("status", ColumnType::Text).with_check(
            "status IN ('Pending', 'Processing', 'Shipped', 'Delivered', 'Cancelled')",
        ),
        Column::new("shipping_address", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("customer_id", Entity::Customer)],
};

pub static ORDER_ITEMS: TableSchema = TableSchema {
    entity: Entity::OrderItem,
    source_file: "order_items.csv",
    primary_key: "order_item_id",
    columns: &[
        Column::required("order_item_id", ColumnType::Integer),
        Column::required("order_id", ColumnType::Integer),
        Column::required("product_id", ColumnType::Integer),
        Column::required("quantity", ColumnType::Integer).with_check("quantity >= 1"),
        Column::new("unit_price", ColumnType::Real),
        Column::new("subtotal", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("order_id", Entity::Order),
        ForeignKey::new("product_id", Entity::Product),
    ],
};

/// Every table, in declaration order
pub static ALL_TABLES: &[&TableSchema] = &[&SUPPLIERS, &PRODUCTS, &CUSTOMERS, &ORDERS, &ORDER_ITEMS];
