//! Card operations.

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;
use serde_json::{Value, json};

use super::types::{CardFilter, NewCard, PatchOp};
use super::{CardList, CreatedCard, Leankit, card_id_of};

/// Wire payload of the card creation endpoint. Field names are part of the
/// service's contract.
#[derive(Serialize)]
struct NewCardPayload<'a> {
    #[serde(rename = "boardId")]
    board_id: String,
    title: &'a str,
    #[serde(rename = "laneId")]
    lane_id: String,
    #[serde(rename = "typeId", skip_serializing_if = "Option::is_none")]
    type_id: Option<&'a str>,
    description: &'a str,
    index: u32,
    size: u64,
    #[serde(rename = "blockReason")]
    block_reason: &'a str,
    #[serde(rename = "externalLink")]
    external_link: ExternalLink<'a>,
    tags: &'a [String],
    #[serde(rename = "customId")]
    custom_id: &'a str,
}

#[derive(Serialize)]
struct ExternalLink<'a> {
    label: &'a str,
    url: &'a str,
}

impl Leankit {
    /// Creates a card in the given lane and returns the new card's id.
    #[tracing::instrument(skip(self, extra))]
    pub async fn add_card(
        &self,
        board_id: u64,
        lane_id: u64,
        title: &str,
        extra: &NewCard,
    ) -> Result<Value> {
        let payload = NewCardPayload {
            board_id: board_id.to_string(),
            title,
            lane_id: lane_id.to_string(),
            type_id: extra.type_id.as_deref(),
            description: extra.description.as_deref().unwrap_or(""),
            index: 1,
            size: extra.size.unwrap_or(0),
            block_reason: "",
            external_link: ExternalLink {
                label: extra.external_system_name.as_deref().unwrap_or(""),
                url: extra.external_url.as_deref().unwrap_or(""),
            },
            tags: &extra.tags,
            custom_id: extra.header.as_deref().unwrap_or(""),
        };

        let created: CreatedCard = self.http.post_json("add card", "/io/card/", &payload).await?;
        info!("added card: {} to lane: {}", title, lane_id);
        Ok(created.id)
    }

    /// Fetches a single card document.
    #[tracing::instrument(skip(self))]
    pub async fn get_card(&self, card_id: u64) -> Result<Value> {
        self.http
            .get_json("get card", &format!("/io/card/{}", card_id))
            .await
    }

    /// Fetches the cards connected to a card as children.
    #[tracing::instrument(skip(self))]
    pub async fn get_children(&self, card_id: u64) -> Result<Vec<Value>> {
        let list: CardList = self
            .http
            .get_json(
                "get children",
                &format!("/io/card/{}/connection/children", card_id),
            )
            .await?;
        Ok(list.cards)
    }

    /// Lists cards matching the filter.
    #[tracing::instrument(skip(self, filter))]
    pub async fn get_cards(&self, filter: &CardFilter) -> Result<Vec<Value>> {
        let query = filter.to_query();
        let list: CardList = self
            .http
            .get_json_with_query("get cards", "/io/card/", &query)
            .await?;
        Ok(list.cards)
    }

    /// Deletes a card, best effort: the outcome is logged but a failure
    /// response from the service is not raised.
    #[tracing::instrument(skip(self, card))]
    pub async fn delete_card(&self, card: &Value) -> Result<()> {
        let card_id = card_id_of(card);
        warn!("delete card {}", card_id);
        self.http
            .delete_best_effort("delete card", &format!("/io/card/{}", card_id))
            .await
    }

    /// Moves a card to the top of the given lane.
    #[tracing::instrument(skip(self, card))]
    pub async fn move_card(&self, board_id: u64, card: &Value, to_lane: u64) -> Result<()> {
        let card_id = card_id_of(card);
        info!("move_card: {} lane: {}", card_id, to_lane);
        self.http
            .post_empty(
                "move card",
                &format!(
                    "/kanban/api/board/{}/MoveCard/{}/lane/{}/position/1",
                    board_id, card_id, to_lane
                ),
            )
            .await
    }

    /// Blocks a card. A missing reason is sent as "Not Specified".
    #[tracing::instrument(skip(self, card))]
    pub async fn block_card(&self, card: &Value, reason: Option<&str>) -> Result<()> {
        let reason = reason.unwrap_or("Not Specified");
        info!("block_card: {} reason: {}", card_id_of(card), reason);
        let payload = json!({
            "CardId": card["id"],
            "IsBlocked": true,
            "BlockReason": reason,
        });
        self.http
            .post("block card", "/kanban/api/card/update", &payload)
            .await
    }

    /// Sets the card's header (`customId`).
    #[tracing::instrument(skip(self))]
    pub async fn update_header(&self, card_id: u64, title: &str) -> Result<()> {
        info!("update header: {}  title: {}", card_id, title);
        self.patch_card("update header", card_id, PatchOp::replace("/customId", title))
            .await
    }

    /// Sets an arbitrary custom field. `path` is the field's JSON pointer,
    /// `value` whatever shape the field expects.
    #[tracing::instrument(skip(self, value))]
    pub async fn update_custom_field(&self, card_id: u64, path: &str, value: Value) -> Result<()> {
        info!(
            "update custom field: id: {} path: {} value: {}",
            card_id, path, value
        );
        self.patch_card("update custom field", card_id, PatchOp::replace(path, value))
            .await
    }

    /// Sets the planned finish date, `yyyy-mm-dd`.
    #[tracing::instrument(skip(self))]
    pub async fn update_planned_finish(&self, card_id: u64, date: &str) -> Result<()> {
        info!("update planned finish: {}  date: {}", card_id, date);
        self.patch_card(
            "update planned finish",
            card_id,
            PatchOp::replace("/plannedFinish", date),
        )
        .await
    }

    /// Clears the planned finish date.
    #[tracing::instrument(skip(self))]
    pub async fn remove_planned_finish(&self, card_id: u64) -> Result<()> {
        info!("remove planned finish: {}", card_id);
        self.patch_card(
            "remove planned finish",
            card_id,
            PatchOp::remove("/plannedFinish"),
        )
        .await
    }

    /// Changes the card's type.
    #[tracing::instrument(skip(self))]
    pub async fn change_card_type(&self, card_id: u64, card_type: u64) -> Result<()> {
        self.patch_card(
            "change card type",
            card_id,
            PatchOp::replace("/typeId", card_type.to_string()),
        )
        .await?;
        info!("Changed card {} type to {}", card_id, card_type);
        Ok(())
    }

    async fn patch_card(&self, operation: &str, card_id: u64, op: PatchOp) -> Result<()> {
        self.http
            .patch(operation, &format!("/io/card/{}", card_id), &[op])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::http::StatusError;
    use crate::retry::RetryPolicy;
    use serde_json::json;
    use std::time::Duration;

    fn test_client(base_url: &str) -> Leankit {
        let config = Config::new(base_url, "user", "pass");
        let policy = RetryPolicy {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            backoff_factor: 1.0,
        };
        Leankit::with_policy(config, policy)
    }

    #[tokio::test]
    async fn test_add_card_returns_new_id() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/io/card/")
            .match_body(mockito::Matcher::Json(json!({
                "boardId": "1",
                "title": "Fix bug",
                "laneId": "2",
                "description": "",
                "index": 1,
                "size": 0,
                "blockReason": "",
                "externalLink": {"label": "", "url": ""},
                "tags": [],
                "customId": ""
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 42}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let id = client
            .add_card(1, 2, "Fix bug", &NewCard::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(id, json!(42));
    }

    #[tokio::test]
    async fn test_add_card_failure_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", "/io/card/")
            .with_status(400)
            .with_body(r#"{"error": "laneId does not exist"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .add_card(1, 2, "Fix bug", &NewCard::default())
            .await
            .unwrap_err();

        let status_err = err.downcast_ref::<StatusError>().unwrap();
        assert_eq!(status_err.status, 400);
        assert!(status_err.body.contains("laneId does not exist"));
    }

    #[tokio::test]
    async fn test_add_card_sends_optional_fields() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/io/card/")
            .match_body(mockito::Matcher::Json(json!({
                "boardId": "1",
                "title": "Ship it",
                "laneId": "2",
                "typeId": "77",
                "description": "release task",
                "index": 1,
                "size": 3,
                "blockReason": "",
                "externalLink": {"label": "jira", "url": "https://jira.example.com/X-1"},
                "tags": ["release"],
                "customId": "X-1"
            })))
            .with_status(201)
            .with_body(r#"{"id": "900"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let extra = NewCard {
            header: Some("X-1".to_string()),
            description: Some("release task".to_string()),
            type_id: Some("77".to_string()),
            size: Some(3),
            external_url: Some("https://jira.example.com/X-1".to_string()),
            external_system_name: Some("jira".to_string()),
            tags: vec!["release".to_string()],
        };
        let id = client.add_card(1, 2, "Ship it", &extra).await.unwrap();

        mock.assert_async().await;
        assert_eq!(id, json!("900"));
    }

    #[tokio::test]
    async fn test_get_card() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/io/card/42")
            .with_status(200)
            .with_body(r#"{"id": 42, "title": "Fix bug", "lane": {"laneClassType": "active"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let card = client.get_card(42).await.unwrap();

        mock.assert_async().await;
        assert_eq!(card["title"], "Fix bug");
    }

    #[tokio::test]
    async fn test_get_children_unwraps_cards() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/io/card/42/connection/children")
            .with_status(200)
            .with_body(r#"{"cards": [{"id": 1}, {"id": 2}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let children = client.get_children(42).await.unwrap();

        mock.assert_async().await;
        assert_eq!(children.len(), 2);
        assert_eq!(children[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_get_cards_query_parameters() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/io/card/")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("board".into(), "1".into()),
                mockito::Matcher::UrlEncoded("lanes".into(), "10,20".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "5000".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"cards": [{"id": 5}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let filter = CardFilter {
            board: Some(1),
            lanes: vec![10, 20],
            ..Default::default()
        };
        let cards = client.get_cards(&filter).await.unwrap();

        mock.assert_async().await;
        assert_eq!(cards, vec![json!({"id": 5})]);
    }

    #[tokio::test]
    async fn test_delete_card_is_best_effort() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("DELETE", "/io/card/42")
            .with_status(403)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.delete_card(&json!({"id": 42})).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_move_card_path() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/kanban/api/board/1/MoveCard/42/lane/7/position/1")
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.move_card(1, &json!({"id": 42}), 7).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_block_card_default_reason() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/kanban/api/card/update")
            .match_body(mockito::Matcher::Json(json!({
                "CardId": 42,
                "IsBlocked": true,
                "BlockReason": "Not Specified"
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.block_card(&json!({"id": 42}), None).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_header_patch_envelope() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PATCH", "/io/card/42")
            .match_body(mockito::Matcher::Json(json!([
                {"op": "replace", "path": "/customId", "value": "ACME-7"}
            ])))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.update_header(42, "ACME-7").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_planned_finish_patch_envelope() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PATCH", "/io/card/42")
            .match_body(mockito::Matcher::Json(json!([
                {"op": "remove", "path": "/plannedFinish"}
            ])))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.remove_planned_finish(42).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_change_card_type_stringifies_id() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PATCH", "/io/card/42")
            .match_body(mockito::Matcher::Json(json!([
                {"op": "replace", "path": "/typeId", "value": "77"}
            ])))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client.change_card_type(42, 77).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_custom_field_raw_value() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("PATCH", "/io/card/42")
            .match_body(mockito::Matcher::Json(json!([
                {"op": "replace", "path": "/customFields/3", "value": {"score": 9}}
            ])))
            .with_status(200)
            .create_async()
            .await;

        let client = test_client(&server.url());
        client
            .update_custom_field(42, "/customFields/3", json!({"score": 9}))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_failure_propagates() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("PATCH", "/io/card/42")
            .with_status(422)
            .with_body("invalid date")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client
            .update_planned_finish(42, "2026-13-01")
            .await
            .unwrap_err();

        let status_err = err.downcast_ref::<StatusError>().unwrap();
        assert_eq!(status_err.status, 422);
        assert_eq!(status_err.body, "invalid date");
    }
}
