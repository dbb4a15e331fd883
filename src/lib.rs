// src/lib.rs

//! VideoByte 交易所的 OpenRTB bidder adapter，以及用于本地联调的 CLI 组件。

pub mod adapters;
pub mod bidding;
pub mod config;
pub mod errors;
pub mod logging;
pub mod mock_exchange;
pub mod openrtb;
pub mod transport;
