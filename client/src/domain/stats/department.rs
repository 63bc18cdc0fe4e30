//! Per-department volume chart.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::document::Document;

/// Label for documents with no department and no sender agency.
pub const UNASSIGNED_LABEL: &str = "Sin Asignar";
/// Labels longer than this are cut and suffixed with `...`.
pub const LABEL_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub label: String,
    pub count: usize,
}

/// Chart label for a document: assigned department, else sender agency,
/// else [`UNASSIGNED_LABEL`].
pub fn department_label(document: &Document) -> String {
    let raw = document
        .assigned_department_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| {
            document
                .sender_dependency
                .as_deref()
                .filter(|agency| !agency.is_empty())
        })
        .unwrap_or(UNASSIGNED_LABEL);

    if raw.chars().count() > LABEL_MAX_CHARS {
        let mut label: String = raw.chars().take(LABEL_MAX_CHARS).collect();
        label.push_str("...");
        label
    } else {
        raw.to_owned()
    }
}

/// The `top_n` busiest departments, most documents first. Labels are
/// grouped after truncation; ties are broken by label.
pub fn by_department(documents: &[Document], top_n: usize) -> Vec<DepartmentCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for document in documents {
        *counts.entry(department_label(document)).or_default() += 1;
    }

    let mut ranked: Vec<DepartmentCount> = counts
        .into_iter()
        .map(|(label, count)| DepartmentCount { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    ranked.truncate(top_n);
    ranked
}
