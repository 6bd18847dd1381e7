use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body used for every plain-text answer: errors, welcome messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: i64, per_page: i64, total: i64) -> Self {
        // An empty table still reports one (empty) page
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_rounds_up() {
        let page: Page<()> = Page::new(vec![], 1, 15, 31);
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page: Page<()> = Page::new(vec![], 1, 15, 0);
        assert_eq!(page.last_page, 1);
    }
}
