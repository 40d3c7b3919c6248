//! Boilerplate removal applied before classification

/// Headings shorter than this (in characters) are dropped when all upper-case
const HEADING_MAX_CHARS: usize = 60;

/// Strip layout noise from extracted text
///
/// Drops blank lines, `=` rulers, and short all-caps headings, then joins the
/// surviving trimmed lines with single spaces.
pub fn clean_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('='))
        .filter(|line| !is_heading(line))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_heading(line: &str) -> bool {
    is_all_caps(line) && line.chars().count() < HEADING_MAX_CHARS
}

/// At least one cased character and no lower-case ones
fn is_all_caps(line: &str) -> bool {
    let mut cased = false;
    for c in line.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_blank_lines_and_rulers() {
        let raw = "  first line  \n\n=====\n   \nsecond line";
        assert_eq!(clean_text(raw), "first line second line");
    }

    #[test]
    fn test_drops_short_all_caps_headings() {
        let raw = "ITEM 7. MANAGEMENT'S DISCUSSION\nRevenue grew 12% in fiscal 2025.";
        assert_eq!(clean_text(raw), "Revenue grew 12% in fiscal 2025.");
    }

    #[test]
    fn test_keeps_long_all_caps_lines() {
        let line = "THIS IS A VERY LONG ALL CAPS LINE THAT GOES ON FOR MORE THAN SIXTY CHARS";
        assert_eq!(clean_text(line), line);
    }

    #[test]
    fn test_keeps_lines_without_letters() {
        assert_eq!(clean_text("2025 2024\n$ 1,234"), "2025 2024 $ 1,234");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("\n\nTABLE OF CONTENTS\n"), "");
    }
}
