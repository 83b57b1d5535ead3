mod db_impl {
    use crate::config::DEFAULT_PAGE_SIZE;
    use crate::errors::ReviewError;
    use crate::models::aggregation::{aggregate, ReviewAggregation, SupplierReviewAggregation};
    use crate::models::catalog::{Order, OrderLine, Person, Product, Shop, Supplier};
    use crate::models::review::{
        ModerationAction, ModerationScope, NewReview, PendingReview, ProductReview,
        ReviewComment, ReviewListEntry, ReviewSelection, ReviewStatus, MAX_RATING, MIN_RATING,
    };
    use crate::pagination::{CommentsPage, Paginator};
    use chrono::Utc;
    use log::{debug, error, info};
    use rusqlite::{params, Connection, OptionalExtension, Row};
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use std::sync::Arc;
    use tokio::sync::Mutex;


    const REVIEW_SELECT: &str = "SELECT r.id, r.shop_id, r.product_id, r.reviewer_id, r.order_line_id,
            ol.supplier_id, r.rating, r.comment, r.would_recommend, r.status, r.created_on
        FROM product_reviews r
        LEFT JOIN order_lines ol ON ol.id = r.order_line_id";

    fn review_from_row(row: &Row<'_>) -> rusqlite::Result<ProductReview> {
        Ok(ProductReview {
            id: row.get(0)?,
            shop_id: row.get(1)?,
            product_id: row.get(2)?,
            reviewer_id: row.get(3)?,
            order_line_id: row.get(4)?,
            supplier_id: row.get(5)?,
            rating: row.get(6)?,
            comment: row.get(7)?,
            would_recommend: row.get(8)?,
            status: row.get(9)?,
            created_on: row.get(10)?,
        })
    }

    fn fetch_review(conn: &Connection, review_id: i64) -> rusqlite::Result<Option<ProductReview>> {
        conn.query_row(
            &format!("{} WHERE r.id = ?1", REVIEW_SELECT),
            [review_id],
            review_from_row,
        )
        .optional()
    }

    fn validated_rating(raw: i64) -> Result<u8, ReviewError> {
        if (MIN_RATING..=MAX_RATING).contains(&raw) {
            Ok(raw as u8)
        } else {
            Err(ReviewError::InvalidRating(raw))
        }
    }

    // Ratings of the product's approved reviews, variation children included
    fn approved_product_ratings(conn: &Connection, product_id: i64) -> rusqlite::Result<Vec<Option<u8>>> {
        let mut stmt = conn.prepare(
            "SELECT r.rating
             FROM product_reviews r
             JOIN products p ON p.id = r.product_id
             WHERE (p.id = ?1 OR p.variation_parent_id = ?1)
               AND r.status = ?2",
        )?;
        let ratings = stmt.query_map(params![product_id, ReviewStatus::Approved], |row| row.get(0))?;
        ratings.collect()
    }

    fn approved_supplier_ratings(conn: &Connection, supplier_id: i64) -> rusqlite::Result<Vec<Option<u8>>> {
        let mut stmt = conn.prepare(
            "SELECT r.rating
             FROM product_reviews r
             JOIN order_lines ol ON ol.id = r.order_line_id
             WHERE ol.supplier_id = ?1
               AND r.status = ?2",
        )?;
        let ratings = stmt.query_map(params![supplier_id, ReviewStatus::Approved], |row| row.get(0))?;
        ratings.collect()
    }

    fn store_supplier_aggregation(
        conn: &Connection,
        supplier_id: i64,
    ) -> Result<SupplierReviewAggregation, ReviewError> {
        let totals = aggregate(approved_supplier_ratings(conn, supplier_id)?);
        let record = SupplierReviewAggregation::from_aggregation(supplier_id, &totals);
        conn.execute(
            "INSERT INTO supplier_review_aggregations (supplier_id, rating, review_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(supplier_id) DO UPDATE SET
                rating = excluded.rating,
                review_count = excluded.review_count",
            params![supplier_id, record.rating.to_string(), record.review_count],
        )?;
        debug!(
            "[DB] Supplier {} aggregation stored: rating={} reviews={}",
            supplier_id, record.rating, record.review_count
        );
        Ok(record)
    }

    struct Transition {
        changed: bool,
        supplier_id: Option<i64>,
    }

    fn apply_status(
        conn: &Connection,
        review_id: i64,
        status: ReviewStatus,
    ) -> Result<Transition, ReviewError> {
        let (current, supplier_id): (ReviewStatus, Option<i64>) = conn
            .query_row(
                "SELECT r.status, ol.supplier_id
                 FROM product_reviews r
                 LEFT JOIN order_lines ol ON ol.id = r.order_line_id
                 WHERE r.id = ?1",
                [review_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or(ReviewError::ReviewNotFound(review_id))?;

        if current == status {
            return Ok(Transition { changed: false, supplier_id });
        }
        conn.execute(
            "UPDATE product_reviews SET status = ?1 WHERE id = ?2",
            params![status, review_id],
        )?;
        debug!("[DB] Review {} moved {} -> {}", review_id, current, status);
        Ok(Transition { changed: true, supplier_id })
    }

    fn scoped_review_ids(conn: &Connection, scope: &ModerationScope) -> rusqlite::Result<Vec<i64>> {
        let mut stmt = conn.prepare(
            "SELECT r.id
             FROM product_reviews r
             LEFT JOIN order_lines ol ON ol.id = r.order_line_id
             WHERE r.shop_id = ?1
               AND (?2 IS NULL OR ol.supplier_id = ?2)
             ORDER BY r.id",
        )?;
        let ids = stmt.query_map(params![scope.shop_id(), scope.supplier_id()], |row| row.get(0))?;
        ids.collect()
    }

    fn insert_or_get_review(
        conn: &Connection,
        shop_id: i64,
        reviewer_id: i64,
        review: &NewReview,
        rating: u8,
    ) -> Result<ProductReview, ReviewError> {
        // Latest purchase of this product from this supplier
        let order_line_id: Option<i64> = conn
            .query_row(
                "SELECT ol.id
                 FROM order_lines ol
                 JOIN orders o ON o.id = ol.order_id
                 WHERE o.shop_id = ?1 AND o.customer_id = ?2
                   AND ol.product_id = ?3 AND ol.supplier_id = ?4
                 ORDER BY ol.id DESC
                 LIMIT 1",
                params![shop_id, reviewer_id, review.product_id, review.supplier_id],
                |row| row.get(0),
            )
            .optional()?;

        let existing = conn
            .query_row(
                &format!(
                    "{} WHERE r.product_id = ?1 AND r.reviewer_id = ?2 AND r.order_line_id IS ?3",
                    REVIEW_SELECT
                ),
                params![review.product_id, reviewer_id, order_line_id],
                review_from_row,
            )
            .optional()?;
        if let Some(existing) = existing {
            debug!("[DB] Review {} already exists, keeping it", existing.id);
            return Ok(existing);
        }

        conn.execute(
            "INSERT INTO product_reviews
                (shop_id, product_id, reviewer_id, order_line_id, rating, comment, would_recommend, status, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                shop_id,
                review.product_id,
                reviewer_id,
                order_line_id,
                rating,
                review.normalized_comment(),
                review.would_recommend,
                ReviewStatus::Pending,
                Utc::now()
            ],
        )?;
        let review_id = conn.last_insert_rowid();
        debug!("[DB] Review {} created for product {}", review_id, review.product_id);
        fetch_review(conn, review_id)?.ok_or(ReviewError::ReviewNotFound(review_id))
    }

    // Shared body of the product and supplier comment listings
    fn comments_page(
        conn: &Connection,
        scope_filter: &str,
        scope_id: i64,
        shop_id: i64,
        raw_page: Option<&str>,
        page_size: u32,
    ) -> Result<CommentsPage, ReviewError> {
        let from = format!(
            "FROM product_reviews r
             JOIN products p ON p.id = r.product_id
             JOIN persons pe ON pe.id = r.reviewer_id
             LEFT JOIN order_lines ol ON ol.id = r.order_line_id
             WHERE {}
               AND r.shop_id = ?2
               AND r.status = ?3
               AND r.comment IS NOT NULL",
            scope_filter
        );

        let count: u32 = conn.query_row(
            &format!("SELECT COUNT(*) {}", from),
            params![scope_id, shop_id, ReviewStatus::Approved],
            |row| row.get(0),
        )?;
        let paginator = Paginator::new(count, page_size);
        let number = paginator.resolve_page(raw_page);

        let mut stmt = conn.prepare(&format!(
            "SELECT r.id, r.created_on, r.rating, r.comment, pe.name {}
             ORDER BY r.created_on DESC, r.id DESC
             LIMIT ?4 OFFSET ?5",
            from
        ))?;
        let rows = stmt.query_map(
            params![scope_id, shop_id, ReviewStatus::Approved, paginator.per_page, paginator.offset(number)],
            |row| {
                Ok(ReviewComment {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    rating: row.get(2)?,
                    comment: row.get(3)?,
                    reviewer: row.get(4)?,
                })
            },
        )?;
        let reviews = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(CommentsPage::new(&paginator, number, reviews))
    }

    /// SQLite-backed review store. Cloning shares the same connection.
    #[derive(Debug, Clone)]
    pub struct Database {
        conn: Arc<Mutex<Connection>>,
        page_size: u32,
    }

    impl Database {
        // Create a new database connection
        pub fn new(db_path: &str) -> Result<Self, ReviewError> {
            let conn = Connection::open(db_path)?;
            info!("[DB] Database connection established at: {}", db_path);
            Ok(Database {
                conn: Arc::new(Mutex::new(conn)),
                page_size: DEFAULT_PAGE_SIZE,
            })
        }

        /// Comments per page for `product_comments` and `supplier_comments`.
        pub fn with_page_size(mut self, page_size: u32) -> Self {
            self.page_size = page_size.max(1);
            self
        }

        pub fn page_size(&self) -> u32 {
            self.page_size
        }

        // Create the database schema
        pub async fn create_schema(&self) -> Result<(), ReviewError> {
            let conn = self.conn.lock().await;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;

            let tables = [
                (
                    "shops",
                    "CREATE TABLE IF NOT EXISTS shops (
                        id INTEGER PRIMARY KEY,
                        identifier TEXT NOT NULL UNIQUE,
                        name TEXT NOT NULL
                    );",
                ),
                (
                    "suppliers",
                    "CREATE TABLE IF NOT EXISTS suppliers (
                        id INTEGER PRIMARY KEY,
                        identifier TEXT NOT NULL UNIQUE,
                        name TEXT NOT NULL
                    );",
                ),
                (
                    "products",
                    "CREATE TABLE IF NOT EXISTS products (
                        id INTEGER PRIMARY KEY,
                        sku TEXT NOT NULL UNIQUE,
                        name TEXT NOT NULL,
                        variation_parent_id INTEGER,
                        FOREIGN KEY (variation_parent_id) REFERENCES products(id) ON DELETE CASCADE
                    );",
                ),
                (
                    "persons",
                    "CREATE TABLE IF NOT EXISTS persons (
                        id INTEGER PRIMARY KEY,
                        name TEXT NOT NULL
                    );",
                ),
                (
                    "orders",
                    "CREATE TABLE IF NOT EXISTS orders (
                        id INTEGER PRIMARY KEY,
                        shop_id INTEGER NOT NULL,
                        customer_id INTEGER NOT NULL,
                        created_at TEXT NOT NULL,
                        FOREIGN KEY (shop_id) REFERENCES shops(id) ON DELETE CASCADE,
                        FOREIGN KEY (customer_id) REFERENCES persons(id) ON DELETE CASCADE
                    );",
                ),
                (
                    "order_lines",
                    "CREATE TABLE IF NOT EXISTS order_lines (
                        id INTEGER PRIMARY KEY,
                        order_id INTEGER NOT NULL,
                        product_id INTEGER NOT NULL,
                        supplier_id INTEGER NOT NULL,
                        FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE CASCADE,
                        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
                        FOREIGN KEY (supplier_id) REFERENCES suppliers(id) ON DELETE CASCADE
                    );",
                ),
                (
                    "product_reviews",
                    "CREATE TABLE IF NOT EXISTS product_reviews (
                        id INTEGER PRIMARY KEY,
                        shop_id INTEGER NOT NULL,
                        product_id INTEGER NOT NULL,
                        reviewer_id INTEGER NOT NULL,
                        order_line_id INTEGER,
                        rating INTEGER CHECK (rating BETWEEN 1 AND 5),
                        comment TEXT,
                        would_recommend INTEGER NOT NULL DEFAULT 0,
                        status TEXT NOT NULL DEFAULT 'pending',
                        created_on TEXT NOT NULL,
                        UNIQUE (product_id, reviewer_id, order_line_id),
                        FOREIGN KEY (shop_id) REFERENCES shops(id) ON DELETE CASCADE,
                        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE,
                        FOREIGN KEY (reviewer_id) REFERENCES persons(id) ON DELETE CASCADE,
                        FOREIGN KEY (order_line_id) REFERENCES order_lines(id) ON DELETE CASCADE
                    );
                    CREATE INDEX IF NOT EXISTS product_reviews_status ON product_reviews (status);",
                ),
                (
                    "supplier_review_aggregations",
                    "CREATE TABLE IF NOT EXISTS supplier_review_aggregations (
                        id INTEGER PRIMARY KEY,
                        supplier_id INTEGER NOT NULL UNIQUE,
                        rating TEXT NOT NULL DEFAULT '0.0',
                        review_count INTEGER NOT NULL DEFAULT 0,
                        FOREIGN KEY (supplier_id) REFERENCES suppliers(id) ON DELETE CASCADE
                    );",
                ),
            ];

            for (table, sql) in tables {
                conn.execute_batch(sql).map_err(|e| {
                    error!("[DB] Failed creating {} table: {}", table, e);
                    e
                })?;
            }
            info!("[DB] Schema ready");
            Ok(())
        }

        pub async fn create_shop(&self, identifier: &str, name: &str) -> Result<Shop, ReviewError> {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO shops (identifier, name) VALUES (?1, ?2)",
                [identifier, name],
            )?;
            Ok(Shop {
                id: conn.last_insert_rowid(),
                identifier: identifier.to_string(),
                name: name.to_string(),
            })
        }

        pub async fn create_supplier(&self, identifier: &str, name: &str) -> Result<Supplier, ReviewError> {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO suppliers (identifier, name) VALUES (?1, ?2)",
                [identifier, name],
            )?;
            Ok(Supplier {
                id: conn.last_insert_rowid(),
                identifier: identifier.to_string(),
                name: name.to_string(),
            })
        }

        pub async fn create_product(
            &self,
            sku: &str,
            name: &str,
            variation_parent_id: Option<i64>,
        ) -> Result<Product, ReviewError> {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO products (sku, name, variation_parent_id) VALUES (?1, ?2, ?3)",
                params![sku, name, variation_parent_id],
            )?;
            Ok(Product {
                id: conn.last_insert_rowid(),
                sku: sku.to_string(),
                name: name.to_string(),
                variation_parent_id,
            })
        }

        pub async fn create_person(&self, name: &str) -> Result<Person, ReviewError> {
            let conn = self.conn.lock().await;
            conn.execute("INSERT INTO persons (name) VALUES (?1)", [name])?;
            Ok(Person {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
            })
        }

        /// Records an order with one line per `(product_id, supplier_id)`.
        pub async fn create_order(
            &self,
            shop_id: i64,
            customer_id: i64,
            lines: &[(i64, i64)],
        ) -> Result<Order, ReviewError> {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            let created_at = Utc::now();

            tx.execute(
                "INSERT INTO orders (shop_id, customer_id, created_at) VALUES (?1, ?2, ?3)",
                params![shop_id, customer_id, created_at],
            )?;
            let order_id = tx.last_insert_rowid();

            let mut order_lines = Vec::with_capacity(lines.len());
            for &(product_id, supplier_id) in lines {
                tx.execute(
                    "INSERT INTO order_lines (order_id, product_id, supplier_id) VALUES (?1, ?2, ?3)",
                    params![order_id, product_id, supplier_id],
                )?;
                order_lines.push(OrderLine {
                    id: tx.last_insert_rowid(),
                    order_id,
                    product_id,
                    supplier_id,
                });
            }
            tx.commit()?;
            debug!("[DB] Order {} created with {} lines", order_id, order_lines.len());

            Ok(Order {
                id: order_id,
                shop_id,
                customer_id,
                created_at,
                lines: order_lines,
            })
        }

        pub async fn get_review(&self, review_id: i64) -> Result<Option<ProductReview>, ReviewError> {
            let conn = self.conn.lock().await;
            Ok(fetch_review(&conn, review_id)?)
        }

        /// Stores one storefront submission. Submissions without a rating are
        /// skipped and yield `None`.
        pub async fn submit_review(
            &self,
            shop_id: i64,
            reviewer_id: i64,
            review: NewReview,
        ) -> Result<Option<ProductReview>, ReviewError> {
            let mut saved = self
                .submit_reviews(shop_id, reviewer_id, std::slice::from_ref(&review))
                .await?;
            Ok(saved.pop())
        }

        /// Stores a batch of submissions atomically; every rating is checked
        /// before anything is written.
        pub async fn submit_reviews(
            &self,
            shop_id: i64,
            reviewer_id: i64,
            reviews: &[NewReview],
        ) -> Result<Vec<ProductReview>, ReviewError> {
            let rated = reviews
                .iter()
                .filter_map(|review| {
                    review
                        .rating
                        .map(|raw| validated_rating(raw).map(|rating| (review, rating)))
                })
                .collect::<Result<Vec<_>, _>>()?;

            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            let mut saved = Vec::with_capacity(rated.len());
            for (review, rating) in rated {
                saved.push(insert_or_get_review(&tx, shop_id, reviewer_id, review, rating)?);
            }
            tx.commit()?;
            info!(
                "[DB] Reviewer {} submitted {} reviews in shop {}",
                reviewer_id,
                saved.len(),
                shop_id
            );
            Ok(saved)
        }

        pub async fn reviews_for_reviewer(
            &self,
            shop_id: i64,
            reviewer_id: i64,
        ) -> Result<Vec<ProductReview>, ReviewError> {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(&format!(
                "{} WHERE r.shop_id = ?1 AND r.reviewer_id = ?2 ORDER BY r.created_on DESC, r.id DESC",
                REVIEW_SELECT
            ))?;
            let reviews = stmt.query_map([shop_id, reviewer_id], review_from_row)?;
            Ok(reviews.collect::<Result<Vec<_>, _>>()?)
        }

        /// Latest unreviewed purchase of every (product, supplier) pair the
        /// reviewer bought in the shop.
        pub async fn pending_products_reviews(
            &self,
            shop_id: i64,
            reviewer_id: i64,
        ) -> Result<Vec<PendingReview>, ReviewError> {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(
                "WITH latest AS (
                    SELECT MAX(ol.id) AS line_id, ol.product_id, ol.supplier_id
                    FROM order_lines ol
                    JOIN orders o ON o.id = ol.order_id
                    WHERE o.shop_id = ?1 AND o.customer_id = ?2
                    GROUP BY ol.product_id, ol.supplier_id
                )
                SELECT l.line_id, l.product_id, l.supplier_id
                FROM latest l
                WHERE NOT EXISTS (
                    SELECT 1 FROM product_reviews r
                    WHERE r.order_line_id = l.line_id AND r.reviewer_id = ?2
                )
                ORDER BY l.line_id",
            )?;
            let pending = stmt.query_map([shop_id, reviewer_id], |row| {
                Ok(PendingReview {
                    order_line_id: row.get(0)?,
                    product_id: row.get(1)?,
                    supplier_id: row.get(2)?,
                })
            })?;
            Ok(pending.collect::<Result<Vec<_>, _>>()?)
        }

        /// Moderation listing, newest first.
        pub async fn list_reviews(
            &self,
            scope: &ModerationScope,
            status: Option<ReviewStatus>,
        ) -> Result<Vec<ReviewListEntry>, ReviewError> {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(
                "SELECT r.id, p.name, pe.name, r.rating, r.comment, r.status
                 FROM product_reviews r
                 JOIN products p ON p.id = r.product_id
                 JOIN persons pe ON pe.id = r.reviewer_id
                 LEFT JOIN order_lines ol ON ol.id = r.order_line_id
                 WHERE r.shop_id = ?1
                   AND (?2 IS NULL OR ol.supplier_id = ?2)
                   AND (?3 IS NULL OR r.status = ?3)
                 ORDER BY r.created_on DESC, r.id DESC",
            )?;
            let entries = stmt.query_map(params![scope.shop_id(), scope.supplier_id(), status], |row| {
                Ok(ReviewListEntry {
                    id: row.get(0)?,
                    product: row.get(1)?,
                    reviewer: row.get(2)?,
                    rating: row.get(3)?,
                    comment: row.get(4)?,
                    status: row.get(5)?,
                })
            })?;
            Ok(entries.collect::<Result<Vec<_>, _>>()?)
        }

        pub async fn reviews_aggregation_for_product(
            &self,
            product_id: i64,
        ) -> Result<ReviewAggregation, ReviewError> {
            let conn = self.conn.lock().await;
            let ratings = approved_product_ratings(&conn, product_id)?;
            Ok(aggregate(ratings))
        }

        pub async fn reviews_aggregation_for_supplier(
            &self,
            supplier_id: i64,
        ) -> Result<ReviewAggregation, ReviewError> {
            let conn = self.conn.lock().await;
            let ratings = approved_supplier_ratings(&conn, supplier_id)?;
            Ok(aggregate(ratings))
        }

        /// Recomputes and persists the supplier's denormalized totals.
        pub async fn refresh_supplier_aggregation(
            &self,
            supplier_id: i64,
        ) -> Result<SupplierReviewAggregation, ReviewError> {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            let record = store_supplier_aggregation(&tx, supplier_id)?;
            tx.commit()?;
            Ok(record)
        }

        pub async fn supplier_review_aggregation(
            &self,
            supplier_id: i64,
        ) -> Result<Option<SupplierReviewAggregation>, ReviewError> {
            let conn = self.conn.lock().await;
            let row: Option<(String, u32)> = conn
                .query_row(
                    "SELECT rating, review_count FROM supplier_review_aggregations WHERE supplier_id = ?1",
                    [supplier_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            row.map(|(rating, review_count)| -> Result<SupplierReviewAggregation, ReviewError> {
                let rating = Decimal::from_str(&rating).map_err(|_| ReviewError::CorruptAggregate(rating))?;
                Ok(SupplierReviewAggregation {
                    supplier_id,
                    rating,
                    review_count,
                })
            })
            .transpose()
        }

        pub async fn approve_review(&self, review_id: i64) -> Result<bool, ReviewError> {
            self.set_review_status(review_id, ReviewStatus::Approved).await
        }

        pub async fn reject_review(&self, review_id: i64) -> Result<bool, ReviewError> {
            self.set_review_status(review_id, ReviewStatus::Rejected).await
        }

        // Status write and supplier refresh share one transaction
        async fn set_review_status(&self, review_id: i64, status: ReviewStatus) -> Result<bool, ReviewError> {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;

            let transition = apply_status(&tx, review_id, status)?;
            if transition.changed {
                if let Some(supplier_id) = transition.supplier_id {
                    store_supplier_aggregation(&tx, supplier_id)?;
                }
            }
            tx.commit()?;

            if transition.changed {
                info!("[DB] Review {} is now {}", review_id, status);
            }
            Ok(transition.changed)
        }

        /// Applies `action` to every selected review inside `scope`; returns
        /// how many reviews actually changed status.
        pub async fn moderate_reviews(
            &self,
            scope: &ModerationScope,
            selection: &ReviewSelection,
            action: ModerationAction,
        ) -> Result<usize, ReviewError> {
            let target = action.target_status();
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;

            let mut changed = 0;
            let mut touched_suppliers = BTreeSet::new();
            for review_id in scoped_review_ids(&tx, scope)? {
                if !selection.contains(review_id) {
                    continue;
                }
                let transition = apply_status(&tx, review_id, target)?;
                if transition.changed {
                    changed += 1;
                    touched_suppliers.extend(transition.supplier_id);
                }
            }
            for supplier_id in touched_suppliers {
                store_supplier_aggregation(&tx, supplier_id)?;
            }
            tx.commit()?;

            info!(
                "[DB] Mass moderation in shop {}: {} reviews {}",
                scope.shop_id(),
                changed,
                target
            );
            Ok(changed)
        }

        pub async fn product_comments(
            &self,
            shop_id: i64,
            product_id: i64,
            page: Option<&str>,
        ) -> Result<CommentsPage, ReviewError> {
            let conn = self.conn.lock().await;
            comments_page(
                &conn,
                "(p.id = ?1 OR p.variation_parent_id = ?1)",
                product_id,
                shop_id,
                page,
                self.page_size,
            )
        }

        pub async fn supplier_comments(
            &self,
            shop_id: i64,
            supplier_id: i64,
            page: Option<&str>,
        ) -> Result<CommentsPage, ReviewError> {
            let conn = self.conn.lock().await;
            comments_page(&conn, "ol.supplier_id = ?1", supplier_id, shop_id, page, self.page_size)
        }
    }
}

pub use db_impl::Database;
