use serde::{Deserialize, Serialize};

/// Body of `POST /api/activities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewActivity {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(alias = "itemName", default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// One row of the `recent_activities` table. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub item_name: Option<String>,
    pub timestamp: String,
    pub icon: Option<String>,
}

impl ActivityEntry {
    pub fn from_draft(draft: NewActivity, id: i64, timestamp: String) -> Self {
        Self {
            id,
            kind: draft.kind,
            message: draft.message,
            item_name: draft.item_name,
            timestamp,
            icon: draft.icon,
        }
    }
}
