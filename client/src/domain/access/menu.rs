//! Navigation menu entries filtered by the access gate.

use serde::{Deserialize, Serialize};

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    label: String,
    href: String,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }

    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    pub fn href(&self) -> &str {
        self.href.as_str()
    }
}

/// Sidebar entries in display order.
pub fn standard_menu() -> Vec<MenuItem> {
    [
        ("Dashboard", "/dashboard/stats"),
        ("Bandeja de Entrada", "/dashboard/inbox"),
        ("Nuevo Oficio", "/dashboard/register"),
        ("Búsqueda", "/dashboard/search"),
        ("Reportes", "/dashboard/reports"),
        ("Configuración", "/dashboard/settings"),
    ]
    .into_iter()
    .map(|(label, href)| MenuItem::new(label, href))
    .collect()
}
