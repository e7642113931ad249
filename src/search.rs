//! Translation of free-text search terms into store filters.

use crate::store::Filter;

/// Builds a filter matching documents where any of `fields` contains `query`,
/// ignoring case.
///
/// An absent or empty query matches everything. The query is used as a
/// pattern verbatim, so pattern metacharacters keep their meaning.
pub fn build_filter(query: Option<&str>, fields: &'static [&'static str]) -> Filter {
	match query {
		Some(query) if !query.is_empty() => Filter::AnyFieldMatches {
			fields,
			pattern: query.to_owned(),
		},
		_ => Filter::All,
	}
}
