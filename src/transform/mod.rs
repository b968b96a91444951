//! Field-level repairs and generic cleaning applied to the source tables
//! before they are joined.

pub mod clean;
pub mod normalize;

pub use clean::clean_table;
pub use normalize::{backfill_type_codes, mark_active_storage, pad_plant_codes};
