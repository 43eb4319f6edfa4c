use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, starting at 1.
    pub page: Option<i64>,
    /// Items per page.
    #[serde(alias = "limit")]
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    /// Returns `(page, per_page, offset)`, clamping per_page to 1..=100.
    pub fn normalize(&self, default_per_page: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamping() {
        assert_eq!(Pagination::default().normalize(10), (1, 10, 0));
        assert_eq!(Pagination::new(3, 20).normalize(10), (3, 20, 40));
        assert_eq!(Pagination::new(0, 1000).normalize(10), (1, 100, 0));
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let (page, per_page, offset) = Pagination::new(i64::MAX, 100).normalize(10);
        assert_eq!((page, per_page), (i64::MAX, 100));
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn limit_is_an_alias_for_per_page() {
        let p: Pagination = serde_json::from_value(serde_json::json!({ "limit": 5, "page": 2 }))
            .expect("pagination");
        assert_eq!(p.normalize(10), (2, 5, 5));
    }
}
