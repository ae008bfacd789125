pub mod analytics;
pub mod classifier;
pub mod clock;
pub mod field;
pub mod ledger;
pub mod scoring;
