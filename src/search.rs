//! # Keyword Search
//!
//! Keyword cleanup and pagination for part lookups. Terms are matched as
//! case-insensitive substrings; there is no ranking.
use crate::catalog::PartRecord;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Search keyword is empty")]
    EmptyKeyword,
}

/// 1-based page number and clamped page size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Page below 1 becomes 1; page size is clamped to `1..=MAX_PAGE_SIZE`
    pub fn new(page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Records to skip before this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of matches with the total match count
#[derive(Debug, Serialize)]
pub struct SearchPage<'a> {
    pub data: Vec<&'a PartRecord>,
    pub total: usize,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// A cleaned-up keyword split into distinct terms
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    lowercase_terms: Vec<String>,
    pagination: Pagination,
}

impl SearchQuery {
    /// Splits `keyword` on any whitespace, ideographic space included, and
    /// drops repeated terms keeping the first occurrence
    pub fn new(keyword: &str, page: Option<usize>, page_size: Option<usize>) -> Result<Self, SearchError> {
        let mut terms: Vec<String> = Vec::new();
        for term in keyword.split_whitespace() {
            if !terms.iter().any(|seen| seen == term) {
                terms.push(term.to_owned());
            }
        }
        if terms.is_empty() {
            return Err(SearchError::EmptyKeyword);
        }

        let lowercase_terms = terms.iter().map(|term| term.to_lowercase()).collect();
        Ok(Self {
            terms,
            lowercase_terms,
            pagination: Pagination::new(page, page_size),
        })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Terms as `%term%` LIKE patterns with `\`, `%` and `_` escaped by `\`
    pub fn like_patterns(&self) -> Vec<String> {
        self.terms
            .iter()
            .map(|term| {
                let mut pattern = String::with_capacity(term.len() + 2);
                pattern.push('%');
                for character in term.chars() {
                    if matches!(character, '\\' | '%' | '_') {
                        pattern.push('\\');
                    }
                    pattern.push(character);
                }
                pattern.push('%');
                pattern
            })
            .collect()
    }

    /// Whether any term occurs in the part number, manufacturer, contact or description
    pub fn matches(&self, record: &PartRecord) -> bool {
        let fields = [
            &record.part_no,
            &record.manufacturer_name,
            &record.contact,
            &record.part_description,
        ]
        .map(|field| field.to_lowercase());
        self.lowercase_terms
            .iter()
            .any(|term| fields.iter().any(|field| field.contains(term.as_str())))
    }

    /// Filters `records` in order and returns the requested page
    pub fn search<'a>(&self, records: &'a [PartRecord]) -> SearchPage<'a> {
        let matched: Vec<&PartRecord> = records.iter().filter(|record| self.matches(record)).collect();
        let total = matched.len();
        let data = matched
            .into_iter()
            .skip(self.pagination.offset())
            .take(self.pagination.page_size)
            .collect();
        SearchPage {
            data,
            total,
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(part_no: &str, manufacturer_name: &str) -> PartRecord {
        PartRecord {
            part_no: part_no.to_owned(),
            manufacturer_name: manufacturer_name.to_owned(),
            ..PartRecord::default()
        }
    }

    #[test]
    fn collapses_whitespace_and_dedupes_terms() {
        let query = SearchQuery::new("  LM358 \u{3000}\u{3000}TI\tLM358  ", None, None).unwrap();
        assert_eq!(query.terms(), ["LM358", "TI"]);
    }

    #[test]
    fn blank_keyword_is_rejected() {
        assert_eq!(SearchQuery::new("", None, None).unwrap_err(), SearchError::EmptyKeyword);
        assert_eq!(SearchQuery::new(" \u{3000}\t", None, None).unwrap_err(), SearchError::EmptyKeyword);
    }

    #[test]
    fn clamps_pagination() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, page_size: 50 });
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, page_size: 1 });
        assert_eq!(Pagination::new(Some(3), Some(1000)), Pagination { page: 3, page_size: 200 });
        assert_eq!(Pagination::new(Some(3), Some(20)).offset(), 40);
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn escapes_like_patterns() {
        let query = SearchQuery::new(r"100% a_b c\d", None, None).unwrap();
        assert_eq!(query.like_patterns(), vec![r"%100\%%", r"%a\_b%", r"%c\\d%"]);
    }

    #[test]
    fn matches_searchable_fields_case_insensitively() {
        let query = SearchQuery::new("acme 358", None, None).unwrap();
        assert!(query.matches(&record("LM358", "TI")));
        assert!(query.matches(&record("X", "ACME Corp")));
        assert!(query.matches(&PartRecord {
            contact: "Sales at Acme".to_owned(),
            ..PartRecord::default()
        }));
        assert!(query.matches(&PartRecord {
            part_description: "op-amp 358 family".to_owned(),
            ..PartRecord::default()
        }));
        assert!(!query.matches(&PartRecord {
            supplier_code: "ACME".to_owned(),
            ..record("X", "Y")
        }));
    }

    #[test]
    fn pages_through_matches_in_order() {
        let records: Vec<PartRecord> = (0..5).map(|index| record(&format!("P{}", index), "Acme")).collect();
        let query = SearchQuery::new("acme", Some(2), Some(2)).unwrap();
        let page = query.search(&records);

        assert_eq!(page.total, 5);
        let part_numbers: Vec<&str> = page.data.iter().map(|record| record.part_no.as_str()).collect();
        assert_eq!(part_numbers, vec!["P2", "P3"]);

        let beyond = SearchQuery::new("acme", Some(9), Some(2)).unwrap().search(&records);
        assert_eq!(beyond.total, 5);
        assert!(beyond.data.is_empty());
    }

    #[test]
    fn serializes_page_with_pagination() {
        let records = vec![record("P1", "Acme")];
        let page = SearchQuery::new("p1", None, None).unwrap().search(&records);
        let value = serde_json::to_value(&page).unwrap();

        assert_eq!(value["total"], json!(1));
        assert_eq!(value["page"], json!(1));
        assert_eq!(value["page_size"], json!(50));
        assert_eq!(value["data"][0]["part_no"], json!("P1"));
    }
}
