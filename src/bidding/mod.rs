// src/bidding/mod.rs

pub mod runner;

pub use runner::{run_bidder, BidderOutcome, RunError};
