//! 行情数据模型
//!
//! 定义返回给前端的报价结构

use serde::Serialize;
use std::collections::HashMap;

/// 单只股票报价
///
/// 上游缺失或类型不对的字段为 `null`，不会省略，也不会填 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quote {
    /// 最新成交价（lastTrade.p）
    pub price: Option<f64>,
    /// 当日涨跌额（todaysChange）
    pub change: Option<f64>,
    /// 当日涨跌幅，百分比（todaysChangePerc）
    #[serde(rename = "changePct")]
    pub change_pct: Option<f64>,
}

/// 代码 -> 报价，每个请求新建，按批次合并
pub type QuoteMap = HashMap<String, Quote>;
