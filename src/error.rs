//! 错误类型
//!
//! - [`QuoteError`]: 终止整个请求的错误，直接映射为 HTTP 响应
//! - [`UpstreamBatchError`]: 单个批次失败的原因，只记录日志，批次被跳过
//! - [`FetchError`]: 上游数据源报告的请求失败

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// 终止请求的错误
///
/// `Display` 即返回给调用方的 `error` 字段，不包含内部细节。
#[derive(Error, Debug)]
pub enum QuoteError {
    /// 非 GET / OPTIONS 请求
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 未配置 Polygon 凭证
    #[error("POLYGON_KEY is not set in environment variables")]
    MissingApiKey,

    /// 缺少 symbols 参数，或参数为空、重复
    #[error("Query param ?symbols=SYM1,SYM2,... is required")]
    MissingSymbols,

    /// symbols 参数解析后没有有效代码
    #[error("No valid symbols provided")]
    NoValidSymbols,

    /// 传输层失败，整个请求中止；内部信息只写日志
    #[error("Failed to fetch quotes from Polygon")]
    UpstreamFetch(String),
}

impl ResponseError for QuoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingSymbols | Self::NoValidSymbols => StatusCode::BAD_REQUEST,
            Self::MissingApiKey | Self::UpstreamFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// 单个批次被跳过的原因
#[derive(Error, Debug, PartialEq)]
pub enum UpstreamBatchError {
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("malformed body: {0}")]
    MalformedBody(String),
}

/// 上游请求失败
#[derive(Error, Debug)]
pub enum FetchError {
    /// 超时：按批次失败处理
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 连接、DNS、读取响应体等传输层错误：中止整个请求
    #[error("transport error: {0}")]
    Transport(String),
}

/// 请求地址的查询串里带有 API Key，错误信息中去掉 URL
impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}
