//! Fixed SQL used by the store outside of the generated table DDL

/// Applied to every connection; foreign keys are checked per statement.
pub const CONNECTION_PRAGMAS: &str = r#"
PRAGMA foreign_keys = ON;
"#;

/// Orders whose recorded total differs from the sum of their item subtotals.
/// Orders without items compare against 0.
pub const ORDER_TOTAL_MISMATCHES: &str = r#"
SELECT o.order_id,
       o.total_amount,
       COALESCE(SUM(oi.subtotal), 0.0) AS item_sum
FROM orders o
LEFT JOIN order_items oi ON oi.order_id = o.order_id
GROUP BY o.order_id, o.total_amount
HAVING ABS(COALESCE(o.total_amount, 0.0) - COALESCE(SUM(oi.subtotal), 0.0)) > ?1
ORDER BY o.order_id
"#;

/// Items whose subtotal is not quantity * unit_price.
pub const LINE_SUBTOTAL_MISMATCHES: &str = r#"
SELECT order_item_id,
       subtotal,
       quantity * unit_price AS expected
FROM order_items
WHERE ABS(COALESCE(subtotal, 0.0) - COALESCE(quantity * unit_price, 0.0)) > ?1
ORDER BY order_item_id
"#;

/// Render a parameterized INSERT for the given table and columns
pub fn insert_statement(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    )
}
