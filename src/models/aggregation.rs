// src/models/aggregation.rs
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Mean rating and review count over a scope's approved reviews.
///
/// A scope without any rated approved review is `{ rating: None, reviews: None }`,
/// which is not the same thing as a zero rating.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewAggregation {
    pub rating: Option<Decimal>,
    pub reviews: Option<u32>,
}

impl ReviewAggregation {
    pub fn empty() -> Self {
        ReviewAggregation::default()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_none()
    }
}

/// Averages already-approved ratings. Null ratings neither contribute to the
/// mean nor count as reviews. The mean keeps one decimal place, midpoints
/// rounded away from zero.
pub fn aggregate<I>(ratings: I) -> ReviewAggregation
where
    I: IntoIterator<Item = Option<u8>>,
{
    let (sum, count) = ratings
        .into_iter()
        .flatten()
        .fold((0i64, 0u32), |(sum, count), rating| (sum + i64::from(rating), count + 1));

    if count == 0 {
        return ReviewAggregation::empty();
    }

    let mut mean = (Decimal::from(sum) / Decimal::from(count))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    // Whole means keep a trailing ".0"
    mean.rescale(1);
    ReviewAggregation {
        rating: Some(mean),
        reviews: Some(count),
    }
}

/// Denormalized per-supplier totals, refreshed whenever one of the
/// supplier's reviews is moderated.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SupplierReviewAggregation {
    pub supplier_id: i64,
    pub rating: Decimal,
    pub review_count: u32,
}

impl SupplierReviewAggregation {
    /// Row stored for a supplier; an empty aggregation persists as 0.0 / 0.
    pub fn from_aggregation(supplier_id: i64, aggregation: &ReviewAggregation) -> Self {
        SupplierReviewAggregation {
            supplier_id,
            rating: aggregation.rating.unwrap_or_else(|| Decimal::new(0, 1)),
            review_count: aggregation.reviews.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(mantissa: i64) -> Decimal {
        Decimal::new(mantissa, 1)
    }

    #[test]
    fn no_ratings_is_none_not_zero() {
        let totals = aggregate(Vec::new());
        assert_eq!(totals, ReviewAggregation { rating: None, reviews: None });
        assert!(totals.is_empty());
    }

    #[test]
    fn single_rating_is_the_mean() {
        let totals = aggregate(vec![Some(5)]);
        assert_eq!(totals.rating, Some(dec(50)));
        assert_eq!(totals.reviews, Some(1));
    }

    #[test]
    fn rating_always_has_one_decimal_place() {
        let rating = aggregate(vec![Some(4)]).rating.unwrap();
        assert_eq!(rating.scale(), 1);
        assert_eq!(rating.to_string(), "4.0");

        let rating = aggregate(vec![Some(3), Some(3), Some(4)]).rating.unwrap();
        assert_eq!(rating.scale(), 1);
        assert_eq!(rating.to_string(), "3.3");

        let row = SupplierReviewAggregation::from_aggregation(1, &ReviewAggregation::empty());
        assert_eq!(row.rating.to_string(), "0.0");
    }

    #[test]
    fn null_ratings_are_skipped() {
        let totals = aggregate(vec![None, Some(2), None, Some(3)]);
        assert_eq!(totals.rating, Some(dec(25)));
        assert_eq!(totals.reviews, Some(2));

        assert_eq!(aggregate(vec![None, None]), ReviewAggregation::empty());
    }

    #[test]
    fn mean_rounds_to_one_decimal() {
        // 10 / 3 = 3.333...
        assert_eq!(aggregate(vec![Some(3), Some(3), Some(4)]).rating, Some(dec(33)));
        // 11 / 3 = 3.666...
        assert_eq!(aggregate(vec![Some(3), Some(4), Some(4)]).rating, Some(dec(37)));
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        // 13 / 4 = 3.25
        let totals = aggregate(vec![Some(3), Some(3), Some(3), Some(4)]);
        assert_eq!(totals.rating, Some(dec(33)));

        // 65 / 20 = 3.25, 3.35 = 67 / 20
        let mut ratings = vec![Some(3); 15];
        ratings.extend(vec![Some(4); 5]);
        assert_eq!(aggregate(ratings).rating, Some(dec(33)));
        let mut ratings = vec![Some(3); 13];
        ratings.extend(vec![Some(4); 7]);
        assert_eq!(aggregate(ratings).rating, Some(dec(34)));
    }

    #[test]
    fn aggregation_is_stable() {
        let ratings = vec![Some(1), Some(5), Some(2), Some(2), Some(3), Some(5), Some(5), Some(5), Some(1), Some(4)];
        let first = aggregate(ratings.clone());
        let second = aggregate(ratings);
        assert_eq!(first, second);
        assert_eq!(first.rating, Some(dec(33)));
        assert_eq!(first.reviews, Some(10));
    }

    #[test]
    fn serializes_as_numbers_or_nulls() {
        let json = serde_json::to_value(aggregate(vec![Some(1), Some(4)])).unwrap();
        assert_eq!(json, serde_json::json!({ "rating": 2.5, "reviews": 2 }));

        let json = serde_json::to_value(ReviewAggregation::empty()).unwrap();
        assert_eq!(json, serde_json::json!({ "rating": null, "reviews": null }));
    }

    #[test]
    fn empty_supplier_row_is_zeroed() {
        let row = SupplierReviewAggregation::from_aggregation(7, &ReviewAggregation::empty());
        assert_eq!(row.rating, Decimal::ZERO);
        assert_eq!(row.review_count, 0);
    }
}
