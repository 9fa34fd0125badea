//! The normalized part record and its tax flag.
use crate::catalog::alias::CanonicalField;
use serde::Serialize;
use std::fmt::Display;

/// Whether a listed price already includes tax.
///
/// Serializes as a bare number for the computed defaults and as a string
/// when copied verbatim from a vendor's tax column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaxIncluded {
    /// Computed per-file default, `0` or `1`
    Flag(u8),
    /// Trimmed value copied from a "tax included" column
    Raw(String),
}

impl TaxIncluded {
    pub const EXCLUDED: TaxIncluded = TaxIncluded::Flag(0);
    pub const INCLUDED: TaxIncluded = TaxIncluded::Flag(1);
}

impl Default for TaxIncluded {
    fn default() -> Self {
        TaxIncluded::EXCLUDED
    }
}

impl Display for TaxIncluded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxIncluded::Flag(flag) => write!(f, "{}", flag),
            TaxIncluded::Raw(value) => f.write_str(value),
        }
    }
}

/// One normalized row of a vendor price list, ready for insertion into the
/// `parts` table. Unmapped fields hold empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartRecord {
    pub part_no: String,
    pub manufacturer_name: String,
    pub part_description: String,
    pub available_qty: String,
    pub moq: String,
    pub spq: String,
    pub order_increment: String,
    pub lead_time: String,
    pub date_code_range: String,
    pub price: String,
    pub currency: String,
    pub certificate_origin: String,
    pub warranty: String,
    pub warehouse_code: String,
    pub eccn_code: String,
    pub hts_code: String,
    pub rohs_compliant: String,
    pub package_type: String,
    pub package: String,
    pub packing: String,
    pub price_validity: String,
    pub contact: String,
    pub supplier_code: String,
    pub qty_1: String,
    pub qty_1_price: String,
    pub qty_2: String,
    pub qty_2_price: String,
    pub qty_3: String,
    pub qty_3_price: String,
    pub tax_included: TaxIncluded,
    /// `YYYY-MM-DD HH:MM:SS`; left out when storage stamps the row itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl PartRecord {
    /// Value of a canonical field
    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::PartNo => &self.part_no,
            CanonicalField::ManufacturerName => &self.manufacturer_name,
            CanonicalField::PartDescription => &self.part_description,
            CanonicalField::AvailableQty => &self.available_qty,
            CanonicalField::Moq => &self.moq,
            CanonicalField::Spq => &self.spq,
            CanonicalField::OrderIncrement => &self.order_increment,
            CanonicalField::LeadTime => &self.lead_time,
            CanonicalField::DateCodeRange => &self.date_code_range,
            CanonicalField::Price => &self.price,
            CanonicalField::Currency => &self.currency,
            CanonicalField::CertificateOrigin => &self.certificate_origin,
            CanonicalField::Warranty => &self.warranty,
            CanonicalField::WarehouseCode => &self.warehouse_code,
            CanonicalField::EccnCode => &self.eccn_code,
            CanonicalField::HtsCode => &self.hts_code,
            CanonicalField::RohsCompliant => &self.rohs_compliant,
            CanonicalField::PackageType => &self.package_type,
            CanonicalField::Package => &self.package,
            CanonicalField::Packing => &self.packing,
            CanonicalField::PriceValidity => &self.price_validity,
            CanonicalField::Contact => &self.contact,
            CanonicalField::SupplierCode => &self.supplier_code,
            CanonicalField::Qty1 => &self.qty_1,
            CanonicalField::Qty1Price => &self.qty_1_price,
            CanonicalField::Qty2 => &self.qty_2,
            CanonicalField::Qty2Price => &self.qty_2_price,
            CanonicalField::Qty3 => &self.qty_3,
            CanonicalField::Qty3Price => &self.qty_3_price,
        }
    }

    /// Mutable slot of a canonical field
    pub(crate) fn get_mut(&mut self, field: CanonicalField) -> &mut String {
        match field {
            CanonicalField::PartNo => &mut self.part_no,
            CanonicalField::ManufacturerName => &mut self.manufacturer_name,
            CanonicalField::PartDescription => &mut self.part_description,
            CanonicalField::AvailableQty => &mut self.available_qty,
            CanonicalField::Moq => &mut self.moq,
            CanonicalField::Spq => &mut self.spq,
            CanonicalField::OrderIncrement => &mut self.order_increment,
            CanonicalField::LeadTime => &mut self.lead_time,
            CanonicalField::DateCodeRange => &mut self.date_code_range,
            CanonicalField::Price => &mut self.price,
            CanonicalField::Currency => &mut self.currency,
            CanonicalField::CertificateOrigin => &mut self.certificate_origin,
            CanonicalField::Warranty => &mut self.warranty,
            CanonicalField::WarehouseCode => &mut self.warehouse_code,
            CanonicalField::EccnCode => &mut self.eccn_code,
            CanonicalField::HtsCode => &mut self.hts_code,
            CanonicalField::RohsCompliant => &mut self.rohs_compliant,
            CanonicalField::PackageType => &mut self.package_type,
            CanonicalField::Package => &mut self.package,
            CanonicalField::Packing => &mut self.packing,
            CanonicalField::PriceValidity => &mut self.price_validity,
            CanonicalField::Contact => &mut self.contact,
            CanonicalField::SupplierCode => &mut self.supplier_code,
            CanonicalField::Qty1 => &mut self.qty_1,
            CanonicalField::Qty1Price => &mut self.qty_1_price,
            CanonicalField::Qty2 => &mut self.qty_2,
            CanonicalField::Qty2Price => &mut self.qty_2_price,
            CanonicalField::Qty3 => &mut self.qty_3,
            CanonicalField::Qty3Price => &mut self.qty_3_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_and_get_mut_address_the_same_slot() {
        let mut record = PartRecord::default();
        for field in CanonicalField::all() {
            *record.get_mut(field) = field.as_str().to_uppercase();
        }
        for field in CanonicalField::all() {
            assert_eq!(record.get(field), field.as_str().to_uppercase());
        }
    }

    #[test]
    fn serializes_with_table_column_names() {
        let record = PartRecord {
            part_no: "ABC123".to_owned(),
            currency: "USD".to_owned(),
            update_time: Some("2024-05-01 08:30:00".to_owned()),
            ..PartRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["part_no"], json!("ABC123"));
        assert_eq!(value["qty_1_price"], json!(""));
        assert_eq!(value["tax_included"], json!(0));
        assert_eq!(value["update_time"], json!("2024-05-01 08:30:00"));
        for field in CanonicalField::all() {
            assert!(value.get(field.as_str()).is_some(), "missing {}", field);
        }
    }

    #[test]
    fn raw_tax_value_serializes_as_string() {
        let record = PartRecord {
            tax_included: TaxIncluded::Raw("1".to_owned()),
            ..PartRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tax_included"], json!("1"));
        assert!(value.get("update_time").is_none());
        assert_eq!(TaxIncluded::INCLUDED.to_string(), "1");
    }
}
