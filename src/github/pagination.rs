//! Page sizing and list endpoint descriptions for paginated GitHub routes.
//!
//! A [`ListEndpoint`] names a route plus its fixed query parameters; the
//! gateway requests the first page and then follows `Link: rel="next"` until
//! GitHub stops advertising one.

use super::error::FetchError;

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u8 = 100;

/// Number of records requested per page, always within `1..=100`.
///
/// # Example
///
/// ```
/// use spec_contrib::github::PageSize;
///
/// assert_eq!(PageSize::new(100).map(PageSize::get), Ok(100));
/// assert!(PageSize::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u8);

impl PageSize {
    /// Validates a page size.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidPagination`] when `per_page` is zero or
    /// exceeds [`MAX_PER_PAGE`].
    pub fn new(per_page: u8) -> Result<Self, FetchError> {
        if per_page == 0 {
            return Err(FetchError::InvalidPagination {
                message: "per_page must be at least 1".to_owned(),
            });
        }

        if per_page > MAX_PER_PAGE {
            return Err(FetchError::InvalidPagination {
                message: format!("per_page must not exceed {MAX_PER_PAGE}"),
            });
        }

        Ok(Self(per_page))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(MAX_PER_PAGE)
    }
}

/// A paginated list route with its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    path: String,
    query: Vec<(String, String)>,
    per_page: PageSize,
}

impl ListEndpoint {
    /// Creates an endpoint for `path` requesting `per_page` records per page.
    #[must_use]
    pub fn new(path: impl Into<String>, per_page: PageSize) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
            per_page,
        }
    }

    /// Adds a fixed query parameter sent with the first page.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Route path relative to the API base.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Page size for the request.
    #[must_use]
    pub const fn per_page(&self) -> PageSize {
        self.per_page
    }

    /// Query parameters for the first page, `per_page` last.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.query.clone();
        pairs.push(("per_page".to_owned(), self.per_page.get().to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ListEndpoint, PageSize};
    use crate::github::error::FetchError;

    #[rstest]
    #[case::zero(0, "per_page must be at least 1")]
    #[case::over_maximum(101, "per_page must not exceed 100")]
    fn rejects_out_of_range_page_sizes(#[case] per_page: u8, #[case] message: &str) {
        assert_eq!(
            PageSize::new(per_page),
            Err(FetchError::InvalidPagination {
                message: message.to_owned()
            })
        );
    }

    #[test]
    fn default_page_size_is_maximum() {
        assert_eq!(PageSize::default().get(), 100);
    }

    #[test]
    fn query_pairs_append_per_page() {
        let endpoint = ListEndpoint::new("/repos/o/r/commits", PageSize::default());
        assert_eq!(
            endpoint.query_pairs(),
            vec![("per_page".to_owned(), "100".to_owned())]
        );
    }
}
