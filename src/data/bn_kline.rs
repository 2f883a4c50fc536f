// External crates
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use binance_sdk::config::ConfigurationRestApi;
use binance_sdk::spot::{
    SpotRestApi,
    rest_api::{KlinesIntervalEnum, KlinesItemInner, KlinesParams, RestApi},
};
use binance_sdk::{errors, errors::ConnectorError as connection_error};

// Local crates
use crate::config::DEBUG_FLAGS;
use crate::config::binance::BinanceApiConfig;
use crate::data::raw_kline::{KlineField, RawKline};
use crate::data::source::{KlineRequest, KlineSource};
use crate::domain::{TimeUnit, Timeframe};

/// Binance only serves a fixed menu of candle widths. Anything else is rejected before the call.
pub fn try_interval_from_timeframe(timeframe: &Timeframe) -> Result<KlinesIntervalEnum> {
    match (timeframe.magnitude(), timeframe.unit()) {
        (1, TimeUnit::Minute) => Ok(KlinesIntervalEnum::Interval1m),
        (3, TimeUnit::Minute) => Ok(KlinesIntervalEnum::Interval3m),
        (5, TimeUnit::Minute) => Ok(KlinesIntervalEnum::Interval5m),
        (15, TimeUnit::Minute) => Ok(KlinesIntervalEnum::Interval15m),
        (30, TimeUnit::Minute) => Ok(KlinesIntervalEnum::Interval30m),
        (1, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval1h),
        (2, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval2h),
        (4, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval4h),
        (6, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval6h),
        (8, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval8h),
        (12, TimeUnit::Hour) => Ok(KlinesIntervalEnum::Interval12h),
        (1, TimeUnit::Day) => Ok(KlinesIntervalEnum::Interval1d),
        (3, TimeUnit::Day) => Ok(KlinesIntervalEnum::Interval3d),
        (1, TimeUnit::Week) => Ok(KlinesIntervalEnum::Interval1w),
        (1, TimeUnit::Month) => Ok(KlinesIntervalEnum::Interval1M),
        _ => Err(anyhow!("Binance does not serve {} klines", timeframe)),
    }
}

fn convert_kline_item(inner: KlinesItemInner) -> KlineField {
    match inner {
        KlinesItemInner::Integer(v) => KlineField::Integer(v),
        KlinesItemInner::String(s) => KlineField::Text(s),
        #[allow(unreachable_patterns)]
        _ => KlineField::Text(String::new()),
    }
}

fn convert_klines(data: Vec<Vec<KlinesItemInner>>) -> Vec<RawKline> {
    data.into_iter()
        .map(|row| RawKline(row.into_iter().map(convert_kline_item).collect()))
        .collect()
}

fn configure_binance_client(config: &BinanceApiConfig) -> Result<RestApi> {
    let rest_conf = ConfigurationRestApi::builder()
        .timeout(config.timeout_ms)
        .retries(config.retries)
        .backoff(config.backoff_ms)
        .build()?;
    // Create the Spot REST API client
    Ok(SpotRestApi::production(rest_conf))
}

/// Coarse cause of a connector failure, used as a log label.
fn connector_error_category(conn_err: &errors::ConnectorError) -> &'static str {
    match conn_err {
        connection_error::ConnectorClientError(_) | connection_error::BadRequestError(_) => {
            "request rejected"
        }
        connection_error::TooManyRequestsError(_) | connection_error::RateLimitBanError(_) => {
            "rate limited"
        }
        connection_error::ServerError { .. } => "exchange-side failure",
        connection_error::NetworkError(_) => "network unreachable",
        connection_error::NotFoundError(_) => "unknown symbol or endpoint",
        connection_error::UnauthorizedError(_) | connection_error::ForbiddenError(_) => {
            "access denied"
        }
    }
}

/// Spot REST klines. One call per request, no pagination: the window is sized to fit `limit`.
pub struct BinanceKlineSource {
    rest_client: RestApi,
}

impl BinanceKlineSource {
    pub fn new(config: &BinanceApiConfig) -> Result<Self> {
        Ok(BinanceKlineSource {
            rest_client: configure_binance_client(config)?,
        })
    }
}

#[async_trait]
impl KlineSource for BinanceKlineSource {
    fn signature(&self) -> &'static str {
        "Binance API"
    }

    async fn fetch_klines(&self, request: &KlineRequest) -> Result<Vec<RawKline>> {
        let params = KlinesParams::builder(
            request.symbol.clone(),
            try_interval_from_timeframe(&request.timeframe)?,
        )
        .limit(request.limit)
        .start_time(Some(request.start_time.timestamp_millis()))
        .end_time(Some(request.end_time.timestamp_millis()))
        .build()?;

        if DEBUG_FLAGS.print_kline_requests {
            log::info!("Requesting klines: {}", request);
        }

        match self.rest_client.klines(params).await {
            Ok(response) => {
                let data = response.data().await?;
                Ok(convert_klines(data))
            }
            Err(e) => {
                if let Some(conn_err) = e.downcast_ref::<errors::ConnectorError>() {
                    log::error!(
                        "{} [{}] {}",
                        request,
                        connector_error_category(conn_err),
                        conn_err
                    );
                    Err(anyhow!("{}", conn_err)
                        .context(format!("Binance API call failed for {}", request)))
                } else {
                    log::error!("An unexpected error occurred for {}: {:#}", request, e);
                    Err(anyhow!("{:#}", e)
                        .context(format!("Unexpected error during API call for {}", request)))
                }
            }
        }
    }
}
