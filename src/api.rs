use crate::db::Database;
use actix_web::{web, HttpResponse};
use log::{debug, error};

/// Registers the review totals routes under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/products/{id}/reviews/totals", web::get().to(product_totals)) // GET /api/products/{id}/reviews/totals
            .route("/suppliers/{id}/reviews/totals", web::get().to(supplier_totals)), // GET /api/suppliers/{id}/reviews/totals
    );
}

pub async fn product_totals(db: web::Data<Database>, product_id: web::Path<i64>) -> HttpResponse {
    let product_id = product_id.into_inner();
    debug!("[API] Review totals requested for product {}", product_id);

    match db.reviews_aggregation_for_product(product_id).await {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(err) => {
            error!("[API] Failed to aggregate reviews for product {}: {:?}", product_id, err);
            HttpResponse::InternalServerError().body("Failed to fetch review totals")
        }
    }
}

pub async fn supplier_totals(db: web::Data<Database>, supplier_id: web::Path<i64>) -> HttpResponse {
    let supplier_id = supplier_id.into_inner();
    debug!("[API] Review totals requested for supplier {}", supplier_id);

    match db.reviews_aggregation_for_supplier(supplier_id).await {
        Ok(totals) => HttpResponse::Ok().json(totals),
        Err(err) => {
            error!("[API] Failed to aggregate reviews for supplier {}: {:?}", supplier_id, err);
            HttpResponse::InternalServerError().body("Failed to fetch review totals")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::NewReview;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    async fn seeded_db() -> (Database, i64, i64) {
        let db = Database::new(":memory:").unwrap();
        db.create_schema().await.unwrap();
        let shop = db.create_shop("default", "Default shop").await.unwrap();
        let supplier = db.create_supplier("default", "Default supplier").await.unwrap();
        let product = db.create_product("product", "Product", None).await.unwrap();
        let customer = db.create_person("Customer").await.unwrap();

        for rating in [1, 4] {
            db.create_order(shop.id, customer.id, &[(product.id, supplier.id)]).await.unwrap();
            let review = db
                .submit_review(shop.id, customer.id, NewReview::rated(product.id, supplier.id, rating))
                .await
                .unwrap()
                .unwrap();
            db.approve_review(review.id).await.unwrap();
        }
        (db, product.id, supplier.id)
    }

    #[actix_web::test]
    async fn totals_are_served_as_json() {
        let (db, product_id, supplier_id) = seeded_db().await;
        let app = test::init_service(App::new().app_data(web::Data::new(db)).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/products/{}/reviews/totals", product_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "rating": 2.5, "reviews": 2 }));

        let req = test::TestRequest::get()
            .uri(&format!("/api/suppliers/{}/reviews/totals", supplier_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "rating": 2.5, "reviews": 2 }));
    }

    #[actix_web::test]
    async fn unknown_product_has_null_totals() {
        let (db, _, _) = seeded_db().await;
        let app = test::init_service(App::new().app_data(web::Data::new(db)).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/products/999/reviews/totals").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "rating": null, "reviews": null }));
    }
}
