use crate::models::review::ReviewComment;
use serde::{Deserialize, Serialize};

/// Splits `count` rows into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub count: u32,
    pub per_page: u32,
}

impl Paginator {
    pub fn new(count: u32, per_page: u32) -> Self {
        Paginator {
            count,
            per_page: per_page.max(1),
        }
    }

    /// Always at least one page, even when there is nothing to show.
    pub fn num_pages(&self) -> u32 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Maps a raw `page` query value to a valid page number. Missing or
    /// non-numeric values land on the first page, out of range numbers on
    /// the last one.
    pub fn resolve_page(&self, raw: Option<&str>) -> u32 {
        let Some(number) = raw.and_then(|raw| raw.trim().parse::<i64>().ok()) else {
            return 1;
        };
        if number < 1 || number > i64::from(self.num_pages()) {
            self.num_pages()
        } else {
            number as u32
        }
    }

    pub fn offset(&self, page: u32) -> u32 {
        page.saturating_sub(1) * self.per_page
    }

    pub fn has_next(&self, page: u32) -> bool {
        page < self.num_pages()
    }
}

/// One page of approved review comments, newest first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommentsPage {
    pub number: u32,
    pub reviews: Vec<ReviewComment>,
    pub next_page: Option<u32>,
}

impl CommentsPage {
    pub fn new(paginator: &Paginator, number: u32, reviews: Vec<ReviewComment>) -> Self {
        CommentsPage {
            number,
            reviews,
            next_page: paginator.has_next(number).then_some(number + 1),
        }
    }
}
