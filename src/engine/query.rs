//! Query derivation from the three collection inputs.

use crate::models::ALL_CATEGORIES;

/// The raw inputs the collection view exposes.
///
/// `refresh` carries no meaning of its own; bumping it forces the currently
/// selected request shape to be issued again (manual reload).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryInput {
    pub search: String,
    pub category: String,
    pub refresh: u64,
}

impl QueryInput {
    pub fn new(search: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
            refresh: 0,
        }
    }
}

/// The effective request derived from a [`QueryInput`].
///
/// Exactly one of three mutually exclusive shapes. Search takes precedence
/// over category filtering; the sentinel "All Categories" (or an empty
/// category) selects the unfiltered listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Full-text search with the raw query string.
    Search { q: String },
    /// Listing scoped to one category.
    Filtered { category: String },
    /// Unfiltered listing.
    All,
}

impl Query {
    /// Derive the request shape for the current inputs.
    pub fn build(input: &QueryInput) -> Self {
        if !input.search.is_empty() {
            Self::Search {
                q: input.search.clone(),
            }
        } else if !input.category.is_empty() && input.category != ALL_CATEGORIES {
            Self::Filtered {
                category: input.category.clone(),
            }
        } else {
            Self::All
        }
    }

    /// Search queries suppress background polling: result sets are
    /// point-in-time and re-polling could change them mid-view.
    pub fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_select_unfiltered_listing() {
        let input = QueryInput::new("", "");
        assert_eq!(Query::build(&input), Query::All);

        let input = QueryInput::new("", ALL_CATEGORIES);
        assert_eq!(Query::build(&input), Query::All);
    }

    #[test]
    fn test_category_selects_filtered_listing() {
        let input = QueryInput::new("", "Finance");
        assert_eq!(
            Query::build(&input),
            Query::Filtered {
                category: "Finance".to_string()
            }
        );
    }

    #[test]
    fn test_search_takes_precedence_over_category() {
        let input = QueryInput::new("invoice", "Finance");
        assert_eq!(
            Query::build(&input),
            Query::Search {
                q: "invoice".to_string()
            }
        );
    }

    #[test]
    fn test_refresh_does_not_change_shape() {
        let mut input = QueryInput::new("", "Legal");
        let before = Query::build(&input);
        input.refresh += 1;
        assert_eq!(Query::build(&input), before);
    }
}
