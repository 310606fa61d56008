//! 批量行情服务
//!
//! 把代码列表按固定大小分批，逐批请求上游并合并结果：
//! - 单批非 2xx、超时、响应体格式错误：记录日志，跳过该批
//! - 传输层错误：中止整个请求

use std::sync::Arc;

use crate::config::PolygonConfig;
use crate::error::{FetchError, QuoteError, UpstreamBatchError};
use crate::models::{Quote, QuoteMap};
use super::polygon::{parse_snapshot_body, SnapshotSource};

/// 日志中保留的上游响应体字符数
const MAX_LOGGED_BODY_CHARS: usize = 200;

/// 单个批次的处理结果
#[derive(Debug)]
pub enum BatchOutcome {
    Merged(Vec<(String, Quote)>),
    Skipped(UpstreamBatchError),
}

/// 解析 symbols 参数
///
/// "aapl, MSFT ,,nvda" -> ["AAPL", "MSFT", "NVDA"]，保留顺序与重复项
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 截断上游错误响应体，按字符边界切分
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// 行情聚合服务
///
/// 凭证在构造时注入；数据源可在进程内所有请求间复用
pub struct QuoteService {
    source: Arc<dyn SnapshotSource>,
    api_key: Option<String>,
    batch_size: usize,
}

impl QuoteService {
    pub fn new(source: Arc<dyn SnapshotSource>, config: &PolygonConfig) -> Self {
        Self {
            source,
            api_key: config.api_key().map(str::to_string),
            batch_size: config.batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 已配置的凭证，缺失时返回 `MissingApiKey`
    pub fn api_key(&self) -> Result<&str, QuoteError> {
        self.api_key.as_deref().ok_or(QuoteError::MissingApiKey)
    }

    /// 逐批获取并合并报价
    ///
    /// 批次严格顺序执行；同一代码出现多次时后写入的覆盖先写入的
    pub async fn get_quotes(&self, symbols: &[String]) -> Result<QuoteMap, QuoteError> {
        let api_key = self.api_key()?;
        let mut quotes = QuoteMap::new();

        for (index, batch) in symbols.chunks(self.batch_size).enumerate() {
            match self.fetch_batch(batch, api_key).await? {
                BatchOutcome::Merged(entries) => {
                    log::debug!("批次 {} 返回 {} 条报价", index, entries.len());
                    quotes.extend(entries);
                }
                BatchOutcome::Skipped(reason) => {
                    log::warn!("跳过批次 {} ({} 个代码): {}", index, batch.len(), reason);
                }
            }
        }

        log::debug!("请求 {} 个代码，解析到 {} 个", symbols.len(), quotes.len());
        Ok(quotes)
    }

    async fn fetch_batch(&self, batch: &[String], api_key: &str) -> Result<BatchOutcome, QuoteError> {
        let reply = match self.source.fetch_snapshot(batch, api_key).await {
            Ok(reply) => reply,
            Err(FetchError::Timeout(msg)) => {
                return Ok(BatchOutcome::Skipped(UpstreamBatchError::Timeout(msg)));
            }
            Err(FetchError::Transport(msg)) => {
                log::error!("Polygon 请求失败: {}", msg);
                return Err(QuoteError::UpstreamFetch(msg));
            }
        };

        if !reply.is_success() {
            return Ok(BatchOutcome::Skipped(UpstreamBatchError::HttpStatus {
                status: reply.status,
                body: truncate_body(&reply.body),
            }));
        }

        Ok(match parse_snapshot_body(&reply.body) {
            Ok(entries) => BatchOutcome::Merged(entries),
            Err(e) => BatchOutcome::Skipped(e),
        })
    }
}
