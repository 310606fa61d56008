//! 通用 API 响应模型
//!
//! 成功：`{ success: true, count, quotes }`
//! 失败：`{ success: false, error }`

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::QuoteMap;

/// 批量行情响应
#[derive(Debug, Serialize)]
pub struct QuotesResponse {
    pub success: bool,
    /// 实际解析到的代码数量，始终等于 `quotes` 的键数
    pub count: usize,
    pub quotes: QuoteMap,
}

impl QuotesResponse {
    pub fn new(quotes: QuoteMap) -> Self {
        Self {
            success: true,
            count: quotes.len(),
            quotes,
        }
    }
}

/// 错误响应，不携带堆栈或内部细节
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    /// 响应时间戳（RFC 3339，UTC）
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
