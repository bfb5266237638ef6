pub mod api;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod lucky;
pub mod matcher;
pub mod mcp_handler;
pub mod schema;
pub mod types;
pub mod use_cases;
pub mod utils;

pub use batch::{BatchSummary, check_prizes_batch};
pub use engine::{check_prize, evaluate, try_check_prize};
pub use error::{CheckError, Result};
pub use lucky::{TicketFilter, is_lucky_number};
pub use matcher::{Tier, matches};
pub use schema::{ParsedDraw, parse_draw_result};
pub use types::*;
