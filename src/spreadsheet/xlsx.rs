use crate::error::PartsCatalogError;
use crate::helpers::reader::UnifiedReader;
use crate::helpers::xml::XmlAttributeHelper;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel::load_relationships;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::RawSheet;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::io::BufRead;
use tracing::debug;
use tracing::warn;
use zip::ZipArchive;

// XML local names for parsing the XLSX format
const TAG_SHARED_STRING_ITEM: &[u8] = b"si"; // Shared string table item
const TAG_PHONETIC_TEXT: &[u8] = b"rPh";     // Phonetic text for Asian languages
const TAG_TEXT: &[u8] = b"t";                // Text content within strings
const TAG_SHEET: &[u8] = b"sheet";           // Worksheet definition
const TAG_SHEET_DATA: &[u8] = b"sheetData";  // Worksheet cell data container
const TAG_ROW: &[u8] = b"row";               // Row in worksheet
const TAG_CELL: &[u8] = b"c";                // Cell in worksheet
const TAG_INLINE_STRING: &[u8] = b"is";      // Inline string value
const TAG_VALUE: &[u8] = b"v";               // Cell value content

/// Worksheet read when the workbook part does not list any sheet
const DEFAULT_SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

/// How a cell's text is interpreted
#[derive(Copy, Clone, Debug, Default, PartialEq)]
enum CellType {
    /// Literal `<v>` text (numbers, booleans, formula results)
    #[default]
    Literal,
    /// Index into the shared string table
    SharedString,
    /// Text held in `<is>` inside the cell
    InlineString,
}

/// An opened XLSX container
pub(crate) struct XlsxSpreadsheet {
    /// File name of the spreadsheet
    pub(crate) name: String,
    /// ZIP archive holding the package parts
    zip: ZipArchive<UnifiedReader>,
    /// Worksheets as (name, zip_path) pairs in workbook order
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens an XLSX container and lists its worksheets
    pub(crate) fn open(name: &str, reader: UnifiedReader) -> Result<XlsxSpreadsheet, PartsCatalogError> {
        let mut zip = ZipArchive::new(reader)?;
        let mut sheets = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            debug!(file_name = name, "workbook lists no sheets, falling back to {}", DEFAULT_SHEET_PATH);
            sheets.push(("Sheet1".to_owned(), DEFAULT_SHEET_PATH.to_owned()));
        }
        Ok(XlsxSpreadsheet {
            name: name.to_owned(),
            zip,
            sheets,
        })
    }

    /// Loads the shared string table; an absent part yields an empty table
    fn load_shared_strings(&mut self) -> Result<Vec<String>, PartsCatalogError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };

        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_SHARED_STRING_ITEM => {
                let string = read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?;
                shared_strings.push(string);
            }
        });
        Ok(shared_strings)
    }

    /// Reads the first worksheet accepted by the criteria into rows of cell strings
    ///
    /// Cells carrying an `r` reference are placed at their column, skipped
    /// columns are filled with empty strings. A reference past column `XFD`
    /// fails the read. Rows without cells are kept
    /// unless the criteria ask to skip blank rows.
    pub(crate) fn read_sheet(&mut self, criteria: &Criteria) -> Result<RawSheet, PartsCatalogError> {
        let (sheet_name, zip_path) = self.sheets
            .iter()
            .find(|(sheet_name, _)| criteria.accept(sheet_name))
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFound(self.name.to_owned()))?;
        let shared_strings = self.load_shared_strings()?;
        debug!(file_name = %self.name, sheet = %sheet_name, shared_strings = shared_strings.len(), "reading worksheet");

        let mut reader = self.zip.xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::WorksheetNotFound(self.name.to_owned(), zip_path.to_owned()))?;
        let mut has_sheet_data = false;
        let mut rows = Vec::<Vec<String>>::new();
        let mut row = Vec::<String>::new();
        let mut next_col = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        match_xml_events!(reader => {
            Event::Start(event) if event.local_name().as_ref() == TAG_SHEET_DATA => {
                has_sheet_data = true;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_ROW => {
                row = Vec::new();
                next_col = 0;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_ROW => {
                let is_blank = row.iter().all(|cell| cell.trim().is_empty());
                if !(criteria.skip_empty_rows && is_blank) {
                    rows.push(std::mem::take(&mut row));
                }
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_CELL => {
                col = match event.get_attribute_value("r")? {
                    Some(reference) => reference_to_index(&reference)
                        .map(|(_, col)| col)
                        .ok_or_else(|| SpreadsheetError::InvalidCellReference(self.name.to_owned(), reference.to_string()))?,
                    None => next_col,
                };
                next_col = col + 1;
                kind = match event.get_attribute_value("t")?.as_deref() {
                    Some("s") => CellType::SharedString,
                    Some("inlineStr") => CellType::InlineString,
                    _ => CellType::Literal,
                };
                value.clear();
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if event.local_name().as_ref() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.local_name().as_ref() == TAG_CELL => {
                let text = match kind {
                    CellType::SharedString => {
                        match value.trim().parse::<usize>().ok().and_then(|index| shared_strings.get(index)) {
                            Some(shared) => shared.to_owned(),
                            None => {
                                warn!(
                                    file_name = %self.name,
                                    cell = %index_to_reference(rows.len(), col),
                                    value = %value,
                                    "shared string index not found, keeping raw value"
                                );
                                std::mem::take(&mut value)
                            }
                        }
                    }
                    CellType::Literal | CellType::InlineString => std::mem::take(&mut value),
                };
                place(&mut row, col, text);
                kind = CellType::default();
            }
        });

        if !has_sheet_data {
            Err(SpreadsheetError::MissingSheetData(self.name.to_owned(), sheet_name.to_owned()))?
        }
        Ok(RawSheet::new(&sheet_name, rows))
    }
}

/// Stores a cell value at its column, padding skipped columns with empty strings
fn place(row: &mut Vec<String>, col: usize, value: String) {
    if row.len() <= col {
        row.resize(col + 1, String::new());
    }
    row[col] = value;
}

/// Loads worksheet names and their part paths from the workbook part
///
/// # Returns
/// Worksheets as (name, zip_path) pairs; empty when the workbook part is absent
fn load_workbook(zip: &mut ZipArchive<UnifiedReader>) -> Result<Vec<(String, String)>, PartsCatalogError> {
    let relationships = load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut sheets: Vec<(String, String)> = Vec::new();
    let mut reader = match zip.xml_reader("xl/workbook.xml")? {
        Some(reader) => reader,
        None => return Ok(sheets),
    };
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_SHEET => {
            let mut name = None::<Cow<str>>;
            let mut id = None::<Cow<str>>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.get_value()?);
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.get_value()?);
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(id.as_ref()) {
                    sheets.push((name.to_string(), path.to_owned()));
                }
            }
        }
    });
    Ok(sheets)
}

/// Reads string content up to `end_tag`, concatenating text runs
///
/// Phonetic annotations are skipped. With `is_text_content` the element's
/// own text is collected; otherwise only text inside `<t>` children counts.
fn read_string_value<R: BufRead>(
    reader: &mut XmlReader<R>,
    end_tag: &[u8],
    is_text_content: bool,
) -> Result<String, PartsCatalogError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.local_name().as_ref() == end_tag => break,
        Event::Start(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.local_name().as_ref() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.local_name().as_ref() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.local_name().as_ref() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_bytes_text(&event)?,
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(xml: &str, end_tag: &[u8], is_text_content: bool) -> String {
        let mut reader = XmlReader::new(xml.as_bytes());
        // Skip the opening element
        reader.next().unwrap();
        read_string_value(&mut reader, end_tag, is_text_content).unwrap()
    }

    #[test]
    fn reads_direct_text() {
        assert_eq!(read("<si><t>Part No.</t></si>", TAG_SHARED_STRING_ITEM, false), "Part No.");
    }

    #[test]
    fn concatenates_runs_and_skips_phonetics() {
        let xml = r#"<si><r><rPr><b/></rPr><t>Cost </t></r><r><t xml:space="preserve">(USD)</t></r><rPh sb="0" eb="1"><t>コスト</t></rPh></si>"#;
        assert_eq!(read(xml, TAG_SHARED_STRING_ITEM, false), "Cost (USD)");
    }

    #[test]
    fn reads_value_text() {
        assert_eq!(read("<v>2.50</v>", TAG_VALUE, true), "2.50");
        assert_eq!(read("<v></v>", TAG_VALUE, true), "");
    }

    #[test]
    fn place_pads_skipped_columns() {
        let mut row = Vec::new();
        place(&mut row, 2, "C".to_owned());
        place(&mut row, 0, "A".to_owned());
        assert_eq!(row, vec!["A", "", "C"]);
    }
}
