pub mod dataset;
pub mod demo_feed;
pub mod export;
pub mod filters;
pub mod rankings;
pub mod state;
