pub mod answer;
pub mod candidate;
pub mod citation;
pub mod context;
pub mod filter;
pub mod intent;
pub mod query_gate;
