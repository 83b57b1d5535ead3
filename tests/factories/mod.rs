#![allow(dead_code)]

use product_reviews::models::catalog::{Order, Person, Product, Shop, Supplier};
use product_reviews::models::review::{NewReview, ProductReview};
use product_reviews::Database;
use uuid::Uuid;

pub async fn create_test_db() -> Database {
    let db = Database::new(":memory:").unwrap();
    db.create_schema().await.unwrap();
    db
}

pub async fn get_default_shop(db: &Database) -> Shop {
    db.create_shop("default", "Default shop").await.unwrap()
}

pub async fn get_default_supplier(db: &Database) -> Supplier {
    db.create_supplier("default", "Default supplier").await.unwrap()
}

pub async fn create_random_person(db: &Database) -> Person {
    db.create_person(&format!("Person {}", Uuid::new_v4())).await.unwrap()
}

pub async fn create_product(db: &Database, sku: &str) -> Product {
    db.create_product(sku, &format!("Product {}", sku), None).await.unwrap()
}

/// One order with a line for every supplier of the product.
pub async fn create_multi_supplier_order_to_review(
    db: &Database,
    shop: &Shop,
    product: &Product,
    suppliers: &[Supplier],
    customer: &Person,
) -> Order {
    let lines: Vec<(i64, i64)> = suppliers.iter().map(|s| (product.id, s.id)).collect();
    db.create_order(shop.id, customer.id, &lines).await.unwrap()
}

/// Submits and approves a review for what the customer bought from `supplier`.
pub async fn create_approved_review(
    db: &Database,
    shop: &Shop,
    customer: &Person,
    product: &Product,
    supplier: &Supplier,
    rating: i64,
) -> ProductReview {
    let review = db
        .submit_review(
            shop.id,
            customer.id,
            NewReview::rated(product.id, supplier.id, rating).with_comment(format!("Rated {}", rating)),
        )
        .await
        .unwrap()
        .unwrap();
    db.approve_review(review.id).await.unwrap();
    db.get_review(review.id).await.unwrap().unwrap()
}

/// A random customer buys the product from `supplier` and leaves an approved rating.
pub async fn create_random_review_for_product(
    db: &Database,
    shop: &Shop,
    product: &Product,
    supplier: &Supplier,
    rating: i64,
) -> ProductReview {
    let customer = create_random_person(db).await;
    db.create_order(shop.id, customer.id, &[(product.id, supplier.id)]).await.unwrap();
    create_approved_review(db, shop, &customer, product, supplier, rating).await
}
