// src/adapters/videobyte/info.rs

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::adapters::BidType;

/// 维护者与能力声明，宿主据此过滤不支持的流量
#[derive(Serialize, Debug, Clone)]
pub struct BidderInfo {
    pub maintainer_email: &'static str,
    pub site_media_types: Vec<BidType>,
    pub app_media_types: Vec<BidType>,
}

impl BidderInfo {
    pub fn supports_site(&self, media_type: BidType) -> bool {
        self.site_media_types.contains(&media_type)
    }

    pub fn supports_app(&self, media_type: BidType) -> bool {
        self.app_media_types.contains(&media_type)
    }
}

pub static BIDDER_INFO: Lazy<BidderInfo> = Lazy::new(|| BidderInfo {
    maintainer_email: "prebid@videobyte.com",
    site_media_types: vec![BidType::Banner, BidType::Video],
    app_media_types: vec![BidType::Banner, BidType::Video],
});
