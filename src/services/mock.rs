//! 测试用的脚本化数据源

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::polygon::{SnapshotSource, UpstreamReply};
use crate::error::FetchError;

/// 每次请求的预设结果
pub enum Step {
    /// 按请求的代码原样返回报价
    Echo,
    /// 指定状态码和响应体
    Reply(u16, String),
    Timeout,
    Transport,
}

/// 按顺序消费 `Step`，脚本用完后一律 `Echo`；记录每次收到的批次
#[derive(Default)]
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls().iter().map(Vec::len).collect()
    }
}

/// 每个代码的报价：price = 100 + 序号
pub fn echo_body(tickers: &[String]) -> String {
    let entries: Vec<_> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| {
            json!({
                "ticker": t,
                "lastTrade": { "p": 100.0 + i as f64 },
                "todaysChange": 1.5,
                "todaysChangePerc": 0.75,
            })
        })
        .collect();
    json!({ "status": "OK", "tickers": entries }).to_string()
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self, tickers: &[String], _api_key: &str) -> Result<UpstreamReply, FetchError> {
        self.calls.lock().unwrap().push(tickers.to_vec());
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Echo);

        match step {
            Step::Echo => Ok(UpstreamReply { status: 200, body: echo_body(tickers) }),
            Step::Reply(status, body) => Ok(UpstreamReply { status, body }),
            Step::Timeout => Err(FetchError::Timeout("operation timed out".to_string())),
            Step::Transport => Err(FetchError::Transport("connection refused".to_string())),
        }
    }
}
