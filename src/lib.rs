//! Async client for the LeanKit kanban board REST API.
//!
//! Card and board documents are passed through as untyped JSON; the client
//! adds authentication, retry with exponential backoff, and the wire envelopes
//! the service expects.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use leankit::{CardFilter, Leankit};
//!
//! let client = Leankit::from_env()?;
//! let cards = client
//!     .get_cards(&CardFilter {
//!         board: Some(30502076986646),
//!         ..Default::default()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod board;
pub mod completion;
pub mod config;
pub mod http;
pub mod retry;

pub use api::{
    CardFilter, DEFAULT_LANE_HISTORY_LIMIT, DEFAULT_LANE_HISTORY_OFFSET, Leankit, NewCard, PatchOp,
};
pub use board::Board;
pub use completion::{DEFAULT_RECENT_DAYS, is_card_completed, is_card_completed_recently};
pub use config::Config;
pub use http::StatusError;
pub use retry::{RetryPolicy, with_retry};
