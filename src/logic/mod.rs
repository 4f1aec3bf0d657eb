//! Stage scoring and advancement engine: aggregation, ranking, completion,
//! advancement, and format resolution.

mod advancement;
mod aggregate;
mod completion;
mod format;
mod rank;

pub use advancement::{plan_advancement, run_advancement, AdvancementMove};
pub use aggregate::aggregate_stage;
pub use completion::{has_all_games, is_stage_complete};
pub use format::{classify, FormatKind, DEFAULT_GAMES_PER_BOWLER};
pub use rank::{assign_positions, stage_standings};
