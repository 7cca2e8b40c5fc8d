pub mod feedback_log;
pub mod output;
pub mod profiles;

pub use feedback_log::FeedbackLog;
pub use output::{write_feature_table, write_matches, MATCH_COLUMNS};
pub use profiles::{read_profiles, BIO_COLUMN, LOOKING_FOR_COLUMN, UID_COLUMN};
