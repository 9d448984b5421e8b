//! The fixed catalog of analytical queries

/// One fixed report: SQL text plus where its result is exported.
#[derive(Debug)]
pub struct CatalogQuery {
    /// Stable identifier, used on the command line
    pub name: &'static str,
    pub title: &'static str,
    pub sql: &'static str,
    pub export_file: &'static str,
}

pub static ORDER_DETAILS: CatalogQuery = CatalogQuery {
    name: "detailed_orders",
    title: "Detailed Order History (Customers, Orders, Order Items, Products)",
    sql: r#"
SELECT
    o.order_id,
    o.order_date,
    c.first_name || ' ' || c.last_name AS customer_name,
    c.email AS customer_email,
    p.product_name,
    p.category,
    oi.quantity,
    oi.unit_price,
    oi.subtotal,
    o.total_amount AS order_total,
    o.status AS order_status
FROM orders o
JOIN customers c ON o.customer_id = c.customer_id
JOIN order_items oi ON o.order_id = oi.order_id
JOIN products p ON oi.product_id = p.product_id
ORDER BY o.order_date DESC, o.order_id ASC
LIMIT 50
"#,
    export_file: "output_detailed_orders.csv",
};

pub static CATEGORY_SALES: CatalogQuery = CatalogQuery {
    name: "category_sales",
    title: "Sales Performance by Product Category",
    sql: r#"
SELECT
    p.category,
    COUNT(DISTINCT oi.order_id) AS total_orders,
    SUM(oi.quantity) AS total_quantity_sold,
    SUM(oi.subtotal) AS total_revenue,
    AVG(oi.unit_price) AS avg_price,
    COUNT(DISTINCT p.product_id) AS unique_products
FROM products p
JOIN order_items oi ON p.product_id = oi.product_id
JOIN orders o ON oi.order_id = o.order_id
WHERE o.status != 'Cancelled'
GROUP BY p.category
ORDER BY total_revenue DESC
"#,
    export_file: "output_category_sales.csv",
};

pub static TOP_CUSTOMERS: CatalogQuery = CatalogQuery {
    name: "top_customers",
    title: "Top 20 Customers by Total Spending",
    sql: r#"
SELECT
    c.customer_id,
    c.first_name || ' ' || c.last_name AS customer_name,
    c.email,
    c.city || ', ' || c.state AS location,
    COUNT(DISTINCT o.order_id) AS total_orders,
    SUM(o.total_amount) AS total_spent,
    AVG(o.total_amount) AS avg_order_value,
    MAX(o.order_date) AS last_order_date
FROM customers c
JOIN orders o ON c.customer_id = o.customer_id
WHERE o.status != 'Cancelled'
GROUP BY c.customer_id, c.first_name, c.last_name, c.email, c.city, c.state
ORDER BY total_spent DESC
LIMIT 20
"#,
    export_file: "output_top_customers.csv",
};

pub static SUPPLIER_PERFORMANCE: CatalogQuery = CatalogQuery {
    name: "supplier_performance",
    title: "Supplier Performance with Product Sales",
    sql: r#"
SELECT
    s.supplier_id,
    s.supplier_name,
    s.city || ', ' || s.state AS supplier_location,
    COUNT(DISTINCT p.product_id) AS products_supplied,
    COUNT(DISTINCT oi.order_id) AS orders_with_products,
    SUM(oi.quantity) AS total_units_sold,
    SUM(oi.subtotal) AS total_revenue,
    AVG(oi.unit_price) AS avg_selling_price
FROM suppliers s
JOIN products p ON s.supplier_id = p.supplier_id
JOIN order_items oi ON p.product_id = oi.product_id
JOIN orders o ON oi.order_id = o.order_id
WHERE o.status != 'Cancelled'
GROUP BY s.supplier_id, s.supplier_name, s.city, s.state
ORDER BY total_revenue DESC
"#,
    export_file: "output_supplier_performance.csv",
};

pub static MONTHLY_SALES: CatalogQuery = CatalogQuery {
    name: "monthly_sales",
    title: "Monthly Sales Summary",
    sql: r#"
SELECT
    strftime('%Y-%m', o.order_date) AS month,
    COUNT(DISTINCT o.order_id) AS total_orders,
    COUNT(DISTINCT o.customer_id) AS unique_customers,
    SUM(o.total_amount) AS total_revenue,
    AVG(o.total_amount) AS avg_order_value
FROM orders o
WHERE o.status != 'Cancelled'
GROUP BY strftime('%Y-%m', o.order_date)
ORDER BY month DESC
"#,
    export_file: "output_monthly_sales.csv",
};

/// Every catalog query, in presentation order
pub static CATALOG: &[&CatalogQuery] = &[
    &ORDER_DETAILS,
    &CATEGORY_SALES,
    &TOP_CUSTOMERS,
    &SUPPLIER_PERFORMANCE,
    &MONTHLY_SALES,
];

/// Look up a catalog query by name
pub fn find(name: &str) -> Option<&'static CatalogQuery> {
    let name = name.trim().to_lowercase().replace('-', "_");
    CATALOG.iter().copied().find(|q| q.name == name)
}
