pub mod bracket;
pub mod dashboard;
pub mod espn_fetcher;
pub mod high_scores;
pub mod league_parser;
pub mod seeding;

pub use bracket::*;
pub use dashboard::*;
pub use espn_fetcher::EspnFetcher;
pub use high_scores::*;
pub use seeding::*;
