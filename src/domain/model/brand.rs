use serde::{Deserialize, Serialize};

/// A manufacturer. Owns zero or more cars; deleting it removes them too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    /// Assigned by the store on insert, never changed afterwards.
    pub id: i64,
    /// Unique across all brands (case-sensitive exact match).
    pub name: String,
    pub country: String,
}

/// Field values for inserting or overwriting a brand.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandDraft {
    pub name: String,
    pub country: String,
}

impl Brand {
    pub fn from_draft(id: i64, draft: BrandDraft) -> Self {
        Self {
            id,
            name: draft.name,
            country: draft.country,
        }
    }
}
