use product_reviews::models::review::NewReview;

mod factories;
use factories::{
    create_product, create_random_person, create_random_review_for_product, create_test_db,
    get_default_shop, get_default_supplier,
};

#[tokio::test]
async fn test_product_comments_page_through_approved_reviews() {
    let db = create_test_db().await.with_page_size(3);
    let shop = get_default_shop(&db).await;
    let supplier = get_default_supplier(&db).await;
    let product = create_product(&db, "paged").await;
    for rating in [5, 4, 3, 2, 1, 5, 4] {
        create_random_review_for_product(&db, &shop, &product, &supplier, rating).await;
    }

    let first = db.product_comments(shop.id, product.id, None).await.unwrap();
    assert_eq!(first.reviews.len(), 3);
    assert_eq!(first.next_page, Some(2));
    assert_eq!(first.reviews[0].comment, "Rated 4");

    let last = db.product_comments(shop.id, product.id, Some("3")).await.unwrap();
    assert_eq!(last.reviews.len(), 1);
    assert_eq!(last.reviews[0].comment, "Rated 5");
    assert_eq!(last.next_page, None);

    let fallback = db.product_comments(shop.id, product.id, Some("not-a-page")).await.unwrap();
    assert_eq!(fallback.number, 1);
}

#[tokio::test]
async fn test_unrated_submission_leaves_nothing_to_list() {
    let db = create_test_db().await;
    let shop = get_default_shop(&db).await;
    let supplier = get_default_supplier(&db).await;
    let product = create_product(&db, "quiet").await;
    let customer = create_random_person(&db).await;
    db.create_order(shop.id, customer.id, &[(product.id, supplier.id)]).await.unwrap();

    let mut review = NewReview::rated(product.id, supplier.id, 3).with_comment("just words");
    review.rating = None;
    assert!(db.submit_review(shop.id, customer.id, review).await.unwrap().is_none());

    let pending = db.pending_products_reviews(shop.id, customer.id).await.unwrap();
    assert_eq!(pending.len(), 1);
    let page = db.supplier_comments(shop.id, supplier.id, None).await.unwrap();
    assert!(page.reviews.is_empty());
    assert_eq!(page.next_page, None);
}
