//! Resolves a vendor header row to canonical columns.
use crate::catalog::alias::CanonicalField;
use crate::catalog::alias::ALIAS_TABLE;
use crate::catalog::alias::TAX_INCLUDED_TOKENS;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Currency used when neither a currency column nor a price-header token is found
pub const DEFAULT_CURRENCY: &str = "USD";

/// Characters marking a required column in vendor templates
const REQUIRED_MARKERS: [char; 2] = ['*', '＊'];

/// A letters-only token right after `(` or `/`, e.g. `Cost (USD)` or `Price/RMB`
static CURRENCY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(/（]([A-Za-z]+)[)/）]?").expect("Hardcode regex pattern"));

/// Canonical field to column index, built fresh for every file.
/// Several fields may point at the same column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMapping(BTreeMap<CanonicalField, usize>);

impl ColumnMapping {
    /// Column index mapped for the field
    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.0.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Mapped (field, column) pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, usize)> + '_ {
        self.0.iter().map(|(field, column)| (*field, *column))
    }
}

impl FromIterator<(CanonicalField, usize)> for ColumnMapping {
    fn from_iter<T: IntoIterator<Item = (CanonicalField, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything learned from a header row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderResolution {
    /// Canonical field to column index
    pub mapping: ColumnMapping,
    /// Uppercased file-level currency
    pub currency: String,
    /// Column holding a per-row "tax included" value
    pub tax_column: Option<usize>,
}

/// Strips leading whitespace and required-field markers, then trims
pub fn normalize_header(header: &str) -> &str {
    header
        .trim_start_matches(|character: char| character.is_whitespace() || REQUIRED_MARKERS.contains(&character))
        .trim()
}

/// Resolves a header row.
///
/// Fields are visited in alias-table order, each field's aliases in
/// declaration order, and for each alias the headers in column order. The
/// first case-insensitive substring hit commits the field to that column.
/// Each field searches independently, so one column can serve several fields.
pub fn resolve(headers: &[String]) -> HeaderResolution {
    let normalized: Vec<String> = headers
        .iter()
        .map(|header| normalize_header(header).to_lowercase())
        .collect();

    let mapping: ColumnMapping = ALIAS_TABLE
        .iter()
        .filter_map(|(field, aliases)| {
            aliases.iter().find_map(|alias| {
                let alias = alias.to_lowercase();
                normalized
                    .iter()
                    .position(|header| header.contains(&alias))
                    .map(|column| (*field, column))
            })
        })
        .collect();

    let tax_column = normalized.iter().position(|header| {
        TAX_INCLUDED_TOKENS
            .iter()
            .any(|token| header.contains(&token.to_lowercase()))
    });

    let currency = detect_currency(headers, &mapping);
    HeaderResolution {
        mapping,
        currency,
        tax_column,
    }
}

/// Picks the file-level currency: the currency header's own text, else a
/// token embedded in the price header, else [`DEFAULT_CURRENCY`]
fn detect_currency(headers: &[String], mapping: &ColumnMapping) -> String {
    let header_text = |field: CanonicalField| {
        mapping
            .get(field)
            .and_then(|column| headers.get(column))
            .map(|header| normalize_header(header))
    };

    if let Some(currency) = header_text(CanonicalField::Currency).filter(|text| !text.is_empty()) {
        return currency.to_uppercase();
    }
    header_text(CanonicalField::Price)
        .and_then(|price| CURRENCY_TOKEN.captures(price))
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_uppercase())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned())
}
