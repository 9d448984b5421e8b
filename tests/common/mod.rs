#![allow(dead_code)]

use std::path::Path;

pub const SUPPLIERS_HEADER: &str = "supplier_id,supplier_name,contact_email,phone,address,city,state";
pub const PRODUCTS_HEADER: &str =
    "product_id,product_name,category,price,stock_quantity,description,supplier_id";
pub const CUSTOMERS_HEADER: &str =
    "customer_id,first_name,last_name,email,phone,address,city,state,zip_code,registration_date";
pub const ORDERS_HEADER: &str = "order_id,customer_id,order_date,total_amount,status,shipping_address";
pub const ORDER_ITEMS_HEADER: &str = "order_item_id,order_id,product_id,quantity,unit_price,subtotal";

pub fn write_csv(dir: &Path, file: &str, header: &str, rows: &[&str]) {
    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(dir.join(file), contents).unwrap();
}

/// A small consistent data set: two categories, one cancelled order
pub fn write_shop(dir: &Path) {
    write_csv(
        dir,
        "suppliers.csv",
        SUPPLIERS_HEADER,
        &[
            "1,Acme Supply,sales@acme.test,555-0100,1 Main St,Springfield,IL",
            "2,Globex,info@globex.test,555-0101,2 Oak Ave,Portland,OR",
            "3,Initech,hello@initech.test,555-0102,3 Pine Rd,Austin,TX",
        ],
    );
    write_csv(
        dir,
        "customers.csv",
        CUSTOMERS_HEADER,
        &[
            "1,Ada,Lovelace,ada@example.test,555-0200,10 Elm St,London,UK,00001,2023-01-10",
            "2,Alan,Turing,alan@example.test,555-0201,11 Elm St,Manchester,UK,00002,2023-02-11",
        ],
    );
    write_csv(
        dir,
        "products.csv",
        PRODUCTS_HEADER,
        &[
            "1,Laptop,Electronics,1000.00,5,\"Fast, light\",1",
            "2,Headphones,Electronics,50.00,20,,2",
            "3,Novel,Books,15.00,100,Paperback,3",
        ],
    );
    write_csv(
        dir,
        "orders.csv",
        ORDERS_HEADER,
        &[
            "1,1,2024-01-15,1050.00,Delivered,10 Elm St",
            "2,2,2024-02-03,30.00,Shipped,11 Elm St",
            "3,2,2024-02-20,15.00,Cancelled,11 Elm St",
        ],
    );
    write_csv(
        dir,
        "order_items.csv",
        ORDER_ITEMS_HEADER,
        &[
            "1,1,1,1,1000.00,1000.00",
            "2,1,2,1,50.00,50.00",
            "3,2,3,2,15.00,30.00",
            "4,3,3,1,15.00,15.00",
        ],
    );
}
