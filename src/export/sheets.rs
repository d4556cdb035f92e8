//! Sheet naming for workbook writers

use std::collections::HashSet;

use crate::models::TableSet;

/// Longest sheet name workbook formats accept
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Sheet name per table, in table order
///
/// The root table takes `base_name`; repeat tables take their label, or the
/// title-cased table name when the label is empty. Names are sanitized and
/// made unique with a numeric suffix.
pub fn sheet_names(tables: &TableSet, base_name: &str) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    tables
        .iter()
        .map(|table| {
            let raw = if table.is_main() {
                base_name.to_string()
            } else if table.label.trim().is_empty() {
                title_case(&table.name)
            } else {
                table.label.clone()
            };
            unique(safe_sheet_name(&raw, MAX_SHEET_NAME_LEN), &mut used)
        })
        .collect()
}

/// Keep alphanumerics, spaces, `-` and `_`; spaces become `_`
pub fn safe_sheet_name(name: &str, max_len: usize) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim_end();
    if trimmed.is_empty() {
        return "unnamed".to_string();
    }
    trimmed.replace(' ', "_").chars().take(max_len).collect()
}

fn unique(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut counter = 2;
    loop {
        let suffix = format!("_{counter}");
        let stem: String = name
            .chars()
            .take(MAX_SHEET_NAME_LEN.saturating_sub(suffix.len()))
            .collect();
        let candidate = format!("{stem}{suffix}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

fn title_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut boundary = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if boundary {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            result.push(c);
            boundary = true;
        }
    }
    result
}
