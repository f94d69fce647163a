//! Utility functions for preparing domain input.

/// Normalize a batch of raw input lines into checkable domain names.
///
/// Every line is trimmed of surrounding whitespace; lines that are empty
/// after trimming are dropped and never dispatched or counted. Nothing
/// else is touched: order is preserved and duplicates are kept, so a
/// domain listed twice is checked twice.
///
/// # Arguments
///
/// * `lines` - Raw input lines, typically straight from a text file
///
/// # Returns
///
/// Vector of trimmed, non-empty domain names ready for checking.
pub fn normalize_lines<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .map(|line| line.as_ref().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
