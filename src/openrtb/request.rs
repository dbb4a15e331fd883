// src/openrtb/request.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// OpenRTB 2.5 BidRequest 结构体
///
/// 只为 adapter 用到的字段建立类型，其余字段进入各层的 `extra` 原样透传；
/// 可选对象为 `None`、数组为空时序列化跳过，转发出去的请求体与入站请求保持一致。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BidRequest {
    pub id: String,

    /// 广告展示请求列表
    #[serde(default)]
    pub imp: Vec<Imp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<App>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmax: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cur: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcat: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badv: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regs: Option<Regs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,

    /// 未建模的字段，原样保留并在序列化时写回
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 单个广告位（impression）
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Imp {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Audio>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<Native>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bidfloorcur: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<i32>,

    /// 各 bidder 自定义的扩展字段，保持原样透传
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Banner {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub format: Vec<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Format {
    pub w: i32,
    pub h: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Video {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minduration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxduration: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocols: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdelay: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linearity: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Audio {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mimes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minduration: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxduration: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Native {
    #[serde(default)]
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ver: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 网站信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Site {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// 来源页面（referrer）
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Publisher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 应用信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct App {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 设备信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ua: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devicetype: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 用户信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyeruid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 请求来源信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Source {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fd: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tid: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 隐私法规信息
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Regs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coppa: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BidRequest {
    /// 复制一份只包含给定 impression 的请求，其余字段与原请求一致
    pub fn with_single_imp(&self, imp: &Imp) -> BidRequest {
        BidRequest {
            imp: vec![imp.clone()],
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn site_ref_uses_wire_name() {
        let request: BidRequest = serde_json::from_value(json!({
            "id": "req-1",
            "imp": [],
            "site": { "domain": "example.com", "ref": "https://example.com/home" }
        }))
        .unwrap();

        let site = request.site.as_ref().unwrap();
        assert_eq!(site.referrer.as_deref(), Some("https://example.com/home"));

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["site"]["ref"], "https://example.com/home");
        assert!(encoded["site"].get("referrer").is_none());
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let request = BidRequest {
            id: "req-2".to_string(),
            imp: vec![Imp {
                id: "imp-1".to_string(),
                video: Some(Video::default()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({ "id": "req-2", "imp": [{ "id": "imp-1", "video": {} }] }));
    }

    #[test]
    fn unmodeled_fields_survive_a_round_trip() {
        let inbound = json!({
            "id": "req-4",
            "imp": [{
                "id": "imp-1",
                "instl": 1,
                "pmp": { "private_auction": 1, "deals": [{ "id": "deal-1", "bidfloor": 2.5 }] },
                "video": { "mimes": ["video/mp4"], "api": [1, 2], "skip": 1 },
                "banner": { "format": [{ "w": 300, "h": 250, "wratio": 6 }], "btype": [4] },
                "ext": { "bidder": { "pubId": "pub" } }
            }],
            "site": { "domain": "example.com", "cat": ["IAB1"], "publisher": { "id": "p", "domain": "pub.com" } },
            "device": { "ua": "x", "os": "ios", "geo": { "country": "USA", "lat": 1.5 } },
            "user": { "id": "u", "eids": [{ "source": "id5", "uids": [{ "id": "abc" }] }] },
            "source": { "tid": "t", "ext": { "schain": { "ver": "1.0", "complete": 1, "nodes": [] } } },
            "regs": { "coppa": 0, "gdpr": 1 },
            "allimps": 0,
            "wseat": ["seat-1"]
        });

        let request: BidRequest = serde_json::from_value(inbound.clone()).unwrap();
        assert_eq!(request.imp[0].extra["instl"], 1);
        assert_eq!(serde_json::to_value(&request).unwrap(), inbound);
    }

    #[test]
    fn single_imp_copy_leaves_original_untouched() {
        let request = BidRequest {
            id: "req-3".to_string(),
            imp: vec![
                Imp { id: "a".to_string(), ..Default::default() },
                Imp { id: "b".to_string(), ..Default::default() },
            ],
            tmax: Some(500),
            ..Default::default()
        };

        let single = request.with_single_imp(&request.imp[1]);
        assert_eq!(single.imp.len(), 1);
        assert_eq!(single.imp[0].id, "b");
        assert_eq!(single.tmax, Some(500));
        assert_eq!(request.imp.len(), 2);
    }
}
