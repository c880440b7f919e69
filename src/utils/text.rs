// src/utils/text.rs
//! Small string helpers shared by the table parsers.

/// Collapses every run of whitespace (including line breaks inside a cell)
/// into a single space and trims both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans a raw cell: `None` for absent or blank cells, otherwise the
/// whitespace-normalized text.
pub fn clean_cell(cell: Option<&str>) -> Option<String> {
    let cleaned = normalize_whitespace(cell?);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Propagates the nearest preceding value downward into empty slots.
pub fn forward_fill(column: &mut [Option<String>]) {
    let mut last: Option<String> = None;
    for slot in column.iter_mut() {
        match slot {
            Some(value) => last = Some(value.clone()),
            None => *slot = last.clone(),
        }
    }
}

/// Appends `fragment` to `target`, separated by a single space.
pub fn push_joined(target: &mut Option<String>, fragment: &str) {
    match target {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(fragment);
        }
        None => *target = Some(fragment.to_string()),
    }
}
