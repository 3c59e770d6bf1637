pub mod config;
pub mod end_state;
pub mod error;
pub mod events;
pub mod player;
pub mod table;
pub mod tally;
