//! 批量行情接口
//!
//! GET /api/quotes?symbols=AAPL,MSFT,NVDA

use actix_web::{web, HttpRequest, HttpResponse};
use url::form_urlencoded;

use crate::error::QuoteError;
use crate::models::QuotesResponse;
use crate::services::quote_service::{parse_symbols, QuoteService};

/// 取唯一的 symbols 参数；缺失、为空或出现多次都视为缺失
fn symbols_param(query: &str) -> Result<String, QuoteError> {
    let mut values = form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "symbols")
        .map(|(_, value)| value.into_owned());

    match (values.next(), values.next()) {
        (Some(value), None) if !value.is_empty() => Ok(value),
        _ => Err(QuoteError::MissingSymbols),
    }
}

/// 批量获取报价
///
/// 校验顺序：凭证 -> symbols 参数 -> 解析后的代码列表
pub async fn get_quotes(
    req: HttpRequest,
    service: web::Data<QuoteService>,
) -> Result<HttpResponse, QuoteError> {
    if let Err(e) = service.api_key() {
        log::error!("{}", e);
        return Err(e);
    }

    let raw = symbols_param(req.query_string())?;
    let symbols = parse_symbols(&raw);
    if symbols.is_empty() {
        return Err(QuoteError::NoValidSymbols);
    }

    let quotes = service.get_quotes(&symbols).await?;
    Ok(HttpResponse::Ok().json(QuotesResponse::new(quotes)))
}

pub async fn method_not_allowed() -> Result<HttpResponse, QuoteError> {
    Err(QuoteError::MethodNotAllowed)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/quotes")
            .route(web::get().to(get_quotes))
            .default_service(web::to(method_not_allowed)),
    );
}
