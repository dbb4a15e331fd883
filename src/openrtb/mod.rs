// src/openrtb/mod.rs

pub mod request;
pub mod response;
