//! Board, task board and history operations.

use anyhow::{Context, Result};
use serde_json::Value;

use super::{Leankit, ReplyEnvelope};
use crate::board::Board;

/// Page size the card position export conventionally uses.
pub const DEFAULT_LANE_HISTORY_LIMIT: u64 = 1000;

/// Starting offset for the first page of the card position export.
pub const DEFAULT_LANE_HISTORY_OFFSET: u64 = 0;

impl Leankit {
    /// Fetches a board document: lanes, card types, tags, custom fields and
    /// users.
    #[tracing::instrument(skip(self))]
    pub async fn get_board(&self, board_id: u64) -> Result<Value> {
        self.http
            .get_json("get board", &format!("/io/board/{}", board_id))
            .await
    }

    /// Fetches a board and wraps it in the [`Board`] accessor.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_board(&self, board_id: u64) -> Result<Board> {
        Ok(Board::new(self.get_board(board_id).await?))
    }

    /// Fetches a card's task sub-board. `Null` when the card has none.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_board(&self, board_id: u64, card_id: u64) -> Result<Value> {
        let envelope: ReplyEnvelope = self
            .http
            .get_json(
                "get task board",
                &format!("/kanban/api/v1/board/{}/card/{}/taskboard", board_id, card_id),
            )
            .await?;
        Ok(envelope.into_first())
    }

    /// Moves a task within a card's sub-board.
    #[tracing::instrument(skip(self))]
    pub async fn move_task(
        &self,
        board_id: u64,
        card_id: u64,
        task_id: u64,
        lane_id: u64,
    ) -> Result<()> {
        self.http
            .post_empty(
                "move task",
                &format!(
                    "/kanban/api/v1/board/{}/move/card/{}/tasks/{}/lane/{}",
                    board_id, card_id, task_id, lane_id
                ),
            )
            .await
    }

    /// Moves every task on a card's sub-board back to its first lane. Does
    /// nothing when the card has no sub-board.
    #[tracing::instrument(skip(self))]
    pub async fn reset_card_tasks(&self, board_id: u64, card_id: u64) -> Result<()> {
        let task_board = self.get_task_board(board_id, card_id).await?;
        if task_board.is_null() {
            return Ok(());
        }

        let Some(lanes) = task_board["Lanes"].as_array() else {
            return Ok(());
        };
        let Some(first_lane) = lanes.first() else {
            return Ok(());
        };
        let backlog_lane_id = first_lane["Id"]
            .as_u64()
            .context("task board lane has no Id")?;

        for lane in lanes {
            for task in lane["Cards"].as_array().into_iter().flatten() {
                let task_id = task["Id"].as_u64().context("task has no Id")?;
                self.move_task(board_id, card_id, task_id, backlog_lane_id)
                    .await?;
            }
        }
        Ok(())
    }

    /// Fetches the event history of a card.
    #[tracing::instrument(skip(self))]
    pub async fn card_history(&self, board_id: u64, card_id: u64) -> Result<Value> {
        let envelope: ReplyEnvelope = self
            .http
            .get_json(
                "card history",
                &format!("/kanban/api/card/history/{}/{}", board_id, card_id),
            )
            .await?;
        Ok(envelope.into_first())
    }

    /// Fetches the card position export for a board, one page at a time.
    ///
    /// Pass [`DEFAULT_LANE_HISTORY_LIMIT`] and [`DEFAULT_LANE_HISTORY_OFFSET`]
    /// for the service's conventional first page; advance `offset` by `limit`
    /// for subsequent pages.
    #[tracing::instrument(skip(self))]
    pub async fn lane_history(&self, board_id: u64, limit: u64, offset: u64) -> Result<Value> {
        let query = [
            ("boardId", board_id.to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.http
            .get_json_with_query(
                "lane history",
                "/io/reporting/export/cardpositions.json",
                &query,
            )
            .await
    }
}
