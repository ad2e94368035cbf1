//! Title normalization and the uppercase-heading heuristic.

/// Reduce a line to its comparison key: uppercase A-Z only.
///
/// Digits, whitespace and punctuation are dropped, so `"The Tempest."` and
/// `"THE  TEMPEST"` both become `"THETEMPEST"`. Non-ASCII letters are dropped
/// after case folding.
pub fn normalize_title(line: &str) -> String {
    line.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .collect()
}

/// True when the line has at least one cased letter and none of them are lowercase.
///
/// Headings in the anthology are set in capitals while body prose is not, so this
/// is the gate a line must pass before it is compared against the catalog.
pub fn is_all_uppercase(line: &str) -> bool {
    let mut has_cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
