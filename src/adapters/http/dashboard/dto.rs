//! Request and response bodies of the dashboard API.

use serde::{Deserialize, Serialize};

use crate::domain::knowledge::{KnowledgeItem, KnowledgeMatch};

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeListResponse {
    pub total: usize,
    pub items: Vec<KnowledgeItem>,
}

impl From<Vec<KnowledgeItem>> for KnowledgeListResponse {
    fn from(items: Vec<KnowledgeItem>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

/// GET /api/dashboard/knowledge/search?q=&limit=
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<KnowledgeMatch>,
}

/// GET /api/dashboard/analytics/funnel?days=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FunnelParams {
    pub days: Option<u32>,
}

/// GET /api/dashboard/analytics/knowledge-gaps?days=&min_occurrences=
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GapParams {
    pub days: Option<u32>,
    pub min_occurrences: Option<usize>,
}

/// PUT /api/dashboard/widget/config. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetConfigRequest {
    pub primary_color: Option<String>,
    pub position: Option<String>,
    pub greeting: Option<String>,
    pub placeholder: Option<String>,
    pub launcher_label: Option<String>,
    pub show_branding: Option<bool>,
}
