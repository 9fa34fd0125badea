//! Conversions between A1-style cell references and 0-based indexes.

/// Index of the last worksheet column, `XFD`
pub(crate) const MAX_COLUMN_INDEX: usize = 16_383;

/// Converts a column label (`A`, `Z`, `AA`) to a 0-based column index.
/// Letters are base-26 with `A` = 1, so `AA` = 27 before the final subtraction.
/// Columns past `XFD` are rejected.
pub(crate) fn column_to_index(label: &str) -> Option<usize> {
    if label.is_empty() {
        return None;
    }
    let mut column = 0usize;
    for character in label.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = (character.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        column = column.checked_mul(26)?.checked_add(digit)?;
    }
    Some(column - 1).filter(|index| *index <= MAX_COLUMN_INDEX)
}

/// Converts a cell reference such as `C7` to 0-based `(row, col)`.
/// Returns `None` when the column letters or the row number are missing.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.trim().trim_start_matches('$');
    let split = reference
        .find(|character: char| !character.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (letters, digits) = reference.split_at(split);
    let col = column_to_index(letters)?;
    let row = digits.trim_start_matches('$').parse::<usize>().ok()?.checked_sub(1)?;
    Some((row, col))
}

/// Converts 0-based `(row, col)` to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    let mut column = col + 1;
    let mut label = String::new();
    while column > 0 {
        column -= 1;
        label.insert(0, (b'A' + (column % 26) as u8) as char);
        column /= 26;
    }
    format!("{}{}", label, row + 1)
}
