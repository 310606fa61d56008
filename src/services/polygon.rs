//! Polygon 快照接口
//!
//! 对接 https://api.polygon.io/v2/snapshot/locale/us/markets/stocks/tickers
//! 一次请求可查询多个代码，返回 `{ "tickers": [ ... ] }`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::config::PolygonConfig;
use crate::error::{FetchError, UpstreamBatchError};
use crate::models::Quote;

/// 快照接口路径
pub const SNAPSHOT_PATH: &str = "/v2/snapshot/locale/us/markets/stocks/tickers";

/// 上游原始响应
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 行情快照数据源
///
/// 只负责一次请求的收发，状态码与响应体的解释交给调用方
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self, tickers: &[String], api_key: &str) -> Result<UpstreamReply, FetchError>;
}

/// Polygon HTTP 客户端，进程内共享连接池
pub struct PolygonClient {
    client: Client,
    base_url: String,
}

impl PolygonClient {
    pub fn new(config: &PolygonConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 构造快照请求地址，逗号连接后的代码列表整体做 URL 编码
    pub fn snapshot_url(&self, tickers: &[String], api_key: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &format!("{}{}", self.base_url, SNAPSHOT_PATH),
            &[("tickers", tickers.join(",").as_str()), ("apiKey", api_key)],
        )
    }
}

#[async_trait]
impl SnapshotSource for PolygonClient {
    async fn fetch_snapshot(&self, tickers: &[String], api_key: &str) -> Result<UpstreamReply, FetchError> {
        let url = self
            .snapshot_url(tickers, api_key)
            .map_err(|e| FetchError::Transport(format!("invalid upstream url: {}", e)))?;

        log::debug!("请求 Polygon 快照: {} 个代码", tickers.len());

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(UpstreamReply { status, body })
    }
}

/// 解析快照响应体
///
/// 响应不是 JSON 或缺少 `tickers` 数组时返回错误，该批次随后被跳过。
/// 每个条目的字段相互独立，缺失或非数字即为 `None`。
pub fn parse_snapshot_body(body: &str) -> Result<Vec<(String, Quote)>, UpstreamBatchError> {
    let data: Value = serde_json::from_str(body)
        .map_err(|e| UpstreamBatchError::MalformedBody(e.to_string()))?;

    let tickers = data
        .get("tickers")
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamBatchError::MalformedBody("missing `tickers` array".to_string()))?;

    Ok(tickers.iter().map(parse_snapshot_entry).collect())
}

fn parse_snapshot_entry(item: &Value) -> (String, Quote) {
    let symbol = item["ticker"].as_str().unwrap_or("").to_uppercase();
    let quote = Quote {
        price: item["lastTrade"]["p"].as_f64(),
        change: item["todaysChange"].as_f64(),
        change_pct: item["todaysChangePerc"].as_f64(),
    };
    (symbol, quote)
}
