//! Polygon 批量行情代理服务
//!
//! 接收逗号分隔的股票代码，分批请求 Polygon 快照接口，
//! 合并为 `代码 -> 报价` 映射返回给前端

mod config;     // 配置加载
mod error;      // 错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use std::sync::Arc;

use crate::config::{AppConfig, API_KEY_ENV};
use crate::middleware::CorsMiddleware;
use crate::services::polygon::PolygonClient;
use crate::services::quote_service::QuoteService;

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();
    if config.polygon.api_key().is_none() {
        log::warn!("未设置 {}，行情接口将返回 500", API_KEY_ENV);
    }

    // 上游客户端在所有 worker 间共享
    let client = PolygonClient::new(&config.polygon)?;
    let service = web::Data::new(QuoteService::new(Arc::new(client), &config.polygon));

    let bind_addr = config.bind_addr();
    log::info!(
        "启动行情代理服务 {}，上游 {}，每批 {} 个代码",
        bind_addr,
        config.polygon.base_url,
        service.batch_size()
    );

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(CorsMiddleware)       // 跨域头与预检
            .wrap(Logger::default())    // 添加请求日志中间件
            .app_data(service.clone())
            .configure(handlers::config) // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
