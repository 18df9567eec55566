mod practice_models;
mod practice_store;
mod sentence_practice;
mod sqlite_practice_store;

pub use practice_models::*;
pub use practice_store::PracticeStore;
pub use sentence_practice::{record_sentence_practice, utc_day_start};
