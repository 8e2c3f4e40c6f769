//! Request types for the card and board operations.
//!
//! Card and board documents themselves are opaque `serde_json::Value`
//! pass-through; only outbound payloads with a fixed wire contract get a
//! serde struct.

use serde::Serialize;
use serde_json::Value;

/// Optional attributes for a new card. Everything a card needs beyond board,
/// lane and title.
///
/// `header` becomes the card's `customId` on the wire; `external_url` and
/// `external_system_name` form the `externalLink` object.
#[derive(Debug, Clone, Default)]
pub struct NewCard {
    pub header: Option<String>,
    pub description: Option<String>,
    pub type_id: Option<String>,
    pub size: Option<u64>,
    pub external_url: Option<String>,
    pub external_system_name: Option<String>,
    pub tags: Vec<String>,
}

/// Filters for listing cards. Absent, empty, zero or false fields are omitted
/// from the outbound query entirely, never sent as empty values; list fields
/// are joined with commas.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFilter {
    pub board: Option<u64>,
    /// Card type id; sent as the `type` query parameter.
    pub card_type: Option<u64>,
    pub lane_class_types: Vec<String>,
    pub lanes: Vec<u64>,
    /// Only cards changed since this timestamp.
    pub since: Option<String>,
    pub deleted: bool,
    /// Restrict the returned fields.
    pub only: Vec<String>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

impl Default for CardFilter {
    fn default() -> Self {
        Self {
            board: None,
            card_type: None,
            lane_class_types: Vec::new(),
            lanes: Vec::new(),
            since: None,
            deleted: false,
            only: Vec::new(),
            search: None,
            limit: 5000,
            offset: 0,
        }
    }
}

impl CardFilter {
    /// Builds the query parameters in the service's expected shape.
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(board) = self.board {
            query.push(("board", board.to_string()));
        }
        if let Some(card_type) = self.card_type {
            query.push(("type", card_type.to_string()));
        }
        if !self.lane_class_types.is_empty() {
            query.push(("lane_class_types", self.lane_class_types.join(",")));
        }
        if !self.lanes.is_empty() {
            let lanes: Vec<String> = self.lanes.iter().map(u64::to_string).collect();
            query.push(("lanes", lanes.join(",")));
        }
        if let Some(since) = &self.since {
            query.push(("since", since.clone()));
        }
        if self.deleted {
            query.push(("deleted", "true".to_string()));
        }
        if !self.only.is_empty() {
            query.push(("only", self.only.join(",")));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if self.limit != 0 {
            query.push(("limit", self.limit.to_string()));
        }
        if self.offset != 0 {
            query.push(("offset", self.offset.to_string()));
        }
        query
    }
}

/// One record of the PATCH envelope used by the card update operations.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PatchOp {
    op: &'static str,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl PatchOp {
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            op: "replace",
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: "remove",
            path: path.into(),
            value: None,
        }
    }
}
