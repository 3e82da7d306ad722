pub mod exclusion;
pub mod matrix_profile;
pub mod numeric;
pub mod rolling_stats;
