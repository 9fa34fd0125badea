//! The static alias table that recognizes canonical fields in vendor headers.
use serde::Serialize;
use std::fmt::Display;

/// A column of the `parts` table that every normalized record exposes.
///
/// Variants are declared in matching order: header resolution walks the
/// fields in exactly this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    PartNo,
    ManufacturerName,
    PartDescription,
    AvailableQty,
    Moq,
    Spq,
    OrderIncrement,
    LeadTime,
    DateCodeRange,
    Price,
    Currency,
    CertificateOrigin,
    Warranty,
    WarehouseCode,
    EccnCode,
    HtsCode,
    RohsCompliant,
    PackageType,
    Package,
    Packing,
    PriceValidity,
    Contact,
    SupplierCode,
    #[serde(rename = "qty_1")]
    Qty1,
    #[serde(rename = "qty_1_price")]
    Qty1Price,
    #[serde(rename = "qty_2")]
    Qty2,
    #[serde(rename = "qty_2_price")]
    Qty2Price,
    #[serde(rename = "qty_3")]
    Qty3,
    #[serde(rename = "qty_3_price")]
    Qty3Price,
}

impl CanonicalField {
    /// Column name in the `parts` table
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PartNo => "part_no",
            Self::ManufacturerName => "manufacturer_name",
            Self::PartDescription => "part_description",
            Self::AvailableQty => "available_qty",
            Self::Moq => "moq",
            Self::Spq => "spq",
            Self::OrderIncrement => "order_increment",
            Self::LeadTime => "lead_time",
            Self::DateCodeRange => "date_code_range",
            Self::Price => "price",
            Self::Currency => "currency",
            Self::CertificateOrigin => "certificate_origin",
            Self::Warranty => "warranty",
            Self::WarehouseCode => "warehouse_code",
            Self::EccnCode => "eccn_code",
            Self::HtsCode => "hts_code",
            Self::RohsCompliant => "rohs_compliant",
            Self::PackageType => "package_type",
            Self::Package => "package",
            Self::Packing => "packing",
            Self::PriceValidity => "price_validity",
            Self::Contact => "contact",
            Self::SupplierCode => "supplier_code",
            Self::Qty1 => "qty_1",
            Self::Qty1Price => "qty_1_price",
            Self::Qty2 => "qty_2",
            Self::Qty2Price => "qty_2_price",
            Self::Qty3 => "qty_3",
            Self::Qty3Price => "qty_3_price",
        }
    }

    /// Every canonical field in matching order
    pub fn all() -> impl ExactSizeIterator<Item = CanonicalField> {
        ALIAS_TABLE.iter().map(|(field, _)| *field)
    }

    /// Header substrings that identify this field, most specific first
    pub fn aliases(&self) -> &'static [&'static str] {
        ALIAS_TABLE
            .iter()
            .find(|(field, _)| field == self)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }
}

impl Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical fields with their header aliases, in matching order.
///
/// Aliases are compared case-insensitively as substrings of the normalized
/// header, so a short alias placed early will shadow longer ones placed later.
pub static ALIAS_TABLE: [(CanonicalField, &[&str]); 29] = [
    (CanonicalField::PartNo, &["Your internal Part id", "Part No", "PartNo", "Part Number", "MPN", "型号", "型號", "料号", "料號"]),
    (CanonicalField::ManufacturerName, &["Manufacturer Name", "MFG", "MFR", "MNF", "Brand", "厂商", "廠商", "品牌", "厂牌", "廠牌"]),
    (CanonicalField::PartDescription, &["Part Description", "Description", "产品参数", "產品參數", "描述", "规格", "規格"]),
    (CanonicalField::AvailableQty, &["Quantity (free on Hand)", "Available Qty", "Stock", "QTY", "Quantity", "库存", "庫存", "数量", "數量"]),
    (CanonicalField::Moq, &["Minimum Order Quantity", "MOQ", "起订量", "起訂量", "最小起订"]),
    (CanonicalField::Spq, &["Standard Pack Quantity", "SPQ", "标准包装", "標準包裝"]),
    (CanonicalField::OrderIncrement, &["Order Increment / Pack Qty", "Order Increment", "Pack Qty", "订购增量", "訂購增量"]),
    (CanonicalField::LeadTime, &["Lead Time", "LeadTime", "L/T", "交期", "货期", "貨期"]),
    (CanonicalField::DateCodeRange, &["Date Code Range", "DateCode", "Date Code", "D/C", "DC", "批号", "批號"]),
    (CanonicalField::Price, &["Resale (web price)", "Unit Price", "Cost (USD)", "Cost", "Price", "单价", "單價", "价格", "價格"]),
    (CanonicalField::Currency, &["Currency", "币种", "幣種", "币别", "幣別", "货币", "貨幣", "RMB", "CNY"]),
    (CanonicalField::CertificateOrigin, &["Country Of Origin", "Certificate of Origin", "COO", "CO,", "原产地", "原產地", "产地", "產地"]),
    (CanonicalField::Warranty, &["Warranty / Pedigree Rating", "Warranty", "Pedigree Rating", "质保", "質保", "保修"]),
    (CanonicalField::WarehouseCode, &["Warehouse Code (if applicable)", "Warehouse Code", "Warehouse", "仓库", "倉庫"]),
    (CanonicalField::EccnCode, &["ECCN Code", "ECCN"]),
    (CanonicalField::HtsCode, &["HTS Code", "HTS", "HS Code", "海关编码", "海關編碼"]),
    (CanonicalField::RohsCompliant, &["RoHS Compliant (Y/N)", "RoHS Compliant", "RoHS", "环保", "環保"]),
    (CanonicalField::PackageType, &["Package Type", "封装类型", "封裝類型"]),
    (CanonicalField::Package, &["Package", "封装", "封裝"]),
    (CanonicalField::Packing, &["Packing", "Packaging", "包装", "包裝"]),
    (CanonicalField::PriceValidity, &["Price Validity", "Valid Until", "报价有效期", "報價有效期", "有效期"]),
    (CanonicalField::Contact, &["Contact", "联系人", "聯繫人", "聯絡人"]),
    (CanonicalField::SupplierCode, &["Supplier Code", "Vendor Code", "Supplier", "供应商", "供應商"]),
    (CanonicalField::Qty1, &["Qty 1 (pcs)", "Qty 1", "Qty1"]),
    (CanonicalField::Qty1Price, &["Qty 1 price (USD)", "Qty 1 price", "Qty1 price"]),
    (CanonicalField::Qty2, &["Qty 2 (pcs)", "Qty 2", "Qty2"]),
    (CanonicalField::Qty2Price, &["Qty 2 price (USD)", "Qty 2 price", "Qty2 price"]),
    (CanonicalField::Qty3, &["Qty 3 (pcs)", "Qty 3", "Qty3"]),
    (CanonicalField::Qty3Price, &["Qty 3 price (USD)", "Qty 3 price", "Qty3 price"]),
];

/// Header substrings meaning "price includes tax"
pub static TAX_INCLUDED_TOKENS: [&str; 3] = ["Tax Included", "含税", "含稅"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_field_has_aliases_and_a_unique_name() {
        let names: HashSet<&str> = CanonicalField::all().map(|field| field.as_str()).collect();
        assert_eq!(names.len(), ALIAS_TABLE.len());
        for field in CanonicalField::all() {
            assert!(!field.aliases().is_empty(), "{} has no aliases", field);
        }
    }

    #[test]
    fn matching_order_follows_declaration() {
        let fields: Vec<CanonicalField> = CanonicalField::all().collect();
        let mut sorted = fields.clone();
        sorted.sort();
        assert_eq!(fields, sorted);
        assert_eq!(fields.first(), Some(&CanonicalField::PartNo));
        assert_eq!(fields.last(), Some(&CanonicalField::Qty3Price));
    }

    #[test]
    fn serialized_names_match_columns() {
        for field in CanonicalField::all() {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }
}
