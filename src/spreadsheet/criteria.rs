use glob::Pattern;

/// Criteria for selecting data from a workbook.
#[derive(Clone, Debug, Default)]
pub(crate) struct Criteria {
    /// Sheet name pattern; the first sheet is read when absent.
    pub(crate) sheet_name_pattern: Option<Pattern>,

    /// Skip rows where all cells are blank.
    pub(crate) skip_empty_rows: bool,
}

impl Criteria {
    /// Checks if a sheet name matches the criteria pattern.
    /// Returns true if no pattern is specified.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_pattern
            .as_ref()
            .map(|pattern| pattern.matches(sheet_name))
            .unwrap_or(true)
    }
}
