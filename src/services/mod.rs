//! 业务逻辑服务模块
//! 
//! 封装数据获取和处理逻辑

pub mod polygon;        // Polygon 快照接口
pub mod quote_service;  // 批量行情聚合

#[cfg(test)]
pub mod mock;
