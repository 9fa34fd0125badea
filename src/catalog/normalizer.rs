//! Turns data rows into canonical part records.
use crate::catalog::alias::CanonicalField;
use crate::catalog::header::ColumnMapping;
use crate::catalog::header::HeaderResolution;
use crate::catalog::record::PartRecord;
use crate::catalog::record::TaxIncluded;

/// Tax flag used for rows without an explicit tax value.
///
/// Every currency defaults to "not included" unless it is listed in
/// `tax_included_currencies`. A listed code matches the whole currency or any
/// word of it, so `RMB` matches `单价(RMB)` and `PRICE (RMB)` (case-insensitive).
pub fn default_tax_included(currency: &str, tax_included_currencies: &[String]) -> TaxIncluded {
    let listed_in = |listed: &String| {
        let listed = listed.trim();
        !listed.is_empty()
            && (listed.eq_ignore_ascii_case(currency.trim())
                || currency
                    .split(|character: char| !character.is_ascii_alphanumeric())
                    .any(|word| word.eq_ignore_ascii_case(listed)))
    };
    if tax_included_currencies.iter().any(listed_in) {
        TaxIncluded::INCLUDED
    } else {
        TaxIncluded::EXCLUDED
    }
}

/// Per-file settings applied identically to every row
#[derive(Clone, Debug)]
pub struct RowNormalizer<'a> {
    mapping: &'a ColumnMapping,
    currency: &'a str,
    tax_column: Option<usize>,
    tax_default: TaxIncluded,
    update_time: Option<String>,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(
        mapping: &'a ColumnMapping,
        currency: &'a str,
        tax_column: Option<usize>,
        tax_default: TaxIncluded,
    ) -> Self {
        Self {
            mapping,
            currency,
            tax_column,
            tax_default,
            update_time: None,
        }
    }

    /// Builds a normalizer from a resolved header
    pub fn from_resolution(resolution: &'a HeaderResolution, tax_default: TaxIncluded) -> Self {
        Self::new(&resolution.mapping, &resolution.currency, resolution.tax_column, tax_default)
    }

    /// Stamps every record with the given update time
    pub fn with_update_time(mut self, update_time: Option<String>) -> Self {
        self.update_time = update_time;
        self
    }

    /// Normalizes data rows (header excluded) one record per row, in order
    pub fn normalize(&self, rows: &[Vec<String>]) -> Vec<PartRecord> {
        rows.iter().map(|row| self.normalize_row(row)).collect()
    }

    fn normalize_row(&self, row: &[String]) -> PartRecord {
        let mut record = PartRecord::default();
        for field in CanonicalField::all() {
            *record.get_mut(field) = self.cell(row, self.mapping.get(field)).to_owned();
        }
        record.currency = self.currency.to_owned();
        record.tax_included = match self.cell(row, self.tax_column) {
            "" => self.tax_default.clone(),
            value => TaxIncluded::Raw(value.to_owned()),
        };
        record.update_time = self.update_time.clone();
        record
    }

    /// Trimmed cell at `column`; empty when unmapped or past the row's end
    fn cell<'r>(&self, row: &'r [String], column: Option<usize>) -> &'r str {
        column
            .and_then(|column| row.get(column))
            .map(|value| value.trim())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::header::resolve;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn normalizes_end_to_end_scenario() {
        let resolution = resolve(&row(&["Part No.", "MFG", "QTY", "Cost (USD)"]));
        let normalizer = RowNormalizer::from_resolution(&resolution, default_tax_included(&resolution.currency, &[]));
        let records = normalizer.normalize(&[row(&["ABC123", "Acme", "10", "2.50"])]);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.part_no, "ABC123");
        assert_eq!(record.manufacturer_name, "Acme");
        assert_eq!(record.available_qty, "10");
        assert_eq!(record.price, "2.50");
        assert_eq!(record.currency, "USD");
        assert_eq!(record.tax_included, TaxIncluded::Flag(0));
        assert_eq!(record.update_time, None);
        let mapped = [
            CanonicalField::PartNo,
            CanonicalField::ManufacturerName,
            CanonicalField::AvailableQty,
            CanonicalField::Price,
            CanonicalField::Currency,
        ];
        for field in CanonicalField::all().filter(|field| !mapped.contains(field)) {
            assert_eq!(record.get(field), "", "{} should be empty", field);
        }
    }

    #[test]
    fn trims_values_and_pads_short_rows() {
        let resolution = resolve(&row(&["Part No.", "MFG", "MOQ"]));
        let normalizer = RowNormalizer::from_resolution(&resolution, TaxIncluded::EXCLUDED);
        let records = normalizer.normalize(&[row(&["  X1 \t", " Acme"]), row(&[]), row(&["X3", "", "100", "extra"])]);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].part_no, "X1");
        assert_eq!(records[0].manufacturer_name, "Acme");
        assert_eq!(records[0].moq, "");
        assert_eq!(records[1], PartRecord {
            currency: "USD".to_owned(),
            ..PartRecord::default()
        });
        assert_eq!(records[2].moq, "100");
    }

    #[test]
    fn currency_column_value_is_overridden_by_file_currency() {
        let resolution = resolve(&row(&["Part No.", "Currency"]));
        let normalizer = RowNormalizer::from_resolution(&resolution, TaxIncluded::EXCLUDED);
        let records = normalizer.normalize(&[row(&["A", "eur"])]);
        assert_eq!(records[0].currency, "CURRENCY");
    }

    #[test]
    fn tax_column_overrides_per_row() {
        let resolution = resolve(&row(&["Part No.", "Tax Included"]));
        assert_eq!(resolution.tax_column, Some(1));
        let normalizer = RowNormalizer::from_resolution(&resolution, TaxIncluded::EXCLUDED);
        let records = normalizer.normalize(&[row(&["A", " 1 "]), row(&["B", ""]), row(&["C"]), row(&["D", "Y"])]);

        assert_eq!(records[0].tax_included, TaxIncluded::Raw("1".to_owned()));
        assert_eq!(records[1].tax_included, TaxIncluded::Flag(0));
        assert_eq!(records[2].tax_included, TaxIncluded::Flag(0));
        assert_eq!(records[3].tax_included, TaxIncluded::Raw("Y".to_owned()));
    }

    #[test]
    fn tax_default_is_zero_unless_configured() {
        assert_eq!(default_tax_included("USD", &[]), TaxIncluded::EXCLUDED);
        assert_eq!(default_tax_included("RMB", &[]), TaxIncluded::EXCLUDED);
        assert_eq!(default_tax_included("CNY", &[]), TaxIncluded::EXCLUDED);

        let listed = vec!["rmb".to_owned(), " CNY ".to_owned()];
        assert_eq!(default_tax_included("RMB", &listed), TaxIncluded::INCLUDED);
        assert_eq!(default_tax_included("CNY", &listed), TaxIncluded::INCLUDED);
        assert_eq!(default_tax_included("USD", &listed), TaxIncluded::EXCLUDED);
    }

    #[test]
    fn listed_currency_matches_word_inside_header_currency() {
        let listed = vec!["RMB".to_owned()];
        assert_eq!(default_tax_included("单价(RMB)", &listed), TaxIncluded::INCLUDED);
        assert_eq!(default_tax_included("PRICE (RMB)", &listed), TaxIncluded::INCLUDED);
        assert_eq!(default_tax_included("PRICE (RMBX)", &listed), TaxIncluded::EXCLUDED);
        assert_eq!(default_tax_included("UNIT PRICE/USD", &listed), TaxIncluded::EXCLUDED);
        assert_eq!(default_tax_included("单价(RMB)", &["".to_owned()]), TaxIncluded::EXCLUDED);

        let resolution = resolve(&row(&["Part No.", "Price (RMB)"]));
        let tax_default = default_tax_included(&resolution.currency, &listed);
        let records = RowNormalizer::from_resolution(&resolution, tax_default).normalize(&[row(&["A", "1.2"])]);
        assert_eq!(records[0].currency, "PRICE (RMB)");
        assert_eq!(records[0].tax_included, TaxIncluded::INCLUDED);
    }

    #[test]
    fn stamps_update_time_when_given() {
        let resolution = resolve(&row(&["Part No."]));
        let normalizer = RowNormalizer::from_resolution(&resolution, TaxIncluded::EXCLUDED)
            .with_update_time(Some("2024-05-01 08:30:00".to_owned()));
        let records = normalizer.normalize(&[row(&["A"]), row(&["B"])]);
        assert!(records.iter().all(|record| record.update_time.as_deref() == Some("2024-05-01 08:30:00")));
    }

    #[test]
    fn normalization_is_idempotent_and_order_preserving() {
        let resolution = resolve(&row(&["型號", "品牌", "含稅"]));
        let normalizer = RowNormalizer::from_resolution(&resolution, TaxIncluded::INCLUDED);
        let rows = vec![row(&["P1", "B1", ""]), row(&["P2", "B2", "0"]), row(&["P3", "B3"])];

        let first = normalizer.normalize(&rows);
        let second = normalizer.normalize(&rows);
        assert_eq!(first, second);
        let part_numbers: Vec<&str> = first.iter().map(|record| record.part_no.as_str()).collect();
        assert_eq!(part_numbers, vec!["P1", "P2", "P3"]);
        assert_eq!(first[0].tax_included, TaxIncluded::INCLUDED);
        assert_eq!(first[1].tax_included, TaxIncluded::Raw("0".to_owned()));
    }
}
