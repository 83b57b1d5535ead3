// src/models/catalog.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Shop {
    pub id: i64,
    pub identifier: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Supplier {
    pub id: i64,
    pub identifier: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub variation_parent_id: Option<i64>, // set on variation children only
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub shop_id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// First line of this order delivered by the given supplier.
    pub fn line_for_supplier(&self, supplier_id: i64) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.supplier_id == supplier_id)
    }
}
