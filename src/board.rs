//! Plain-data accessors over a fetched board document.

use serde_json::Value;

/// A board document with convenience accessors.
///
/// Holds the JSON returned by the board endpoint; accessors never touch the
/// network. Missing or differently-shaped fields read as empty rather than
/// panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    data: Value,
}

impl Board {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// The raw board document.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn title(&self) -> Option<&str> {
        self.data["title"].as_str()
    }

    pub fn lanes(&self) -> &[Value] {
        self.array("lanes")
    }

    pub fn card_types(&self) -> &[Value] {
        self.array("cardTypes")
    }

    pub fn custom_fields(&self) -> &[Value] {
        self.array("customFields")
    }

    pub fn tags(&self) -> &[Value] {
        self.array("tags")
    }

    pub fn default_card_type_id(&self) -> Option<&str> {
        self.data["defaultCardTypeId"].as_str()
    }

    /// Full names of the board's users.
    pub fn user_names(&self) -> Vec<&str> {
        self.array("users")
            .iter()
            .filter_map(|user| user["fullName"].as_str())
            .collect()
    }

    fn array(&self, key: &str) -> &[Value] {
        self.data[key].as_array().map(Vec::as_slice).unwrap_or(&[])
    }
}
