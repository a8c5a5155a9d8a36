use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::application::{AppError, AppResult, StockProvider};
use crate::domain::{DatacenterStatus, StockTarget};

pub const DEFAULT_OVH_API_BASE: &str = "https://ca.api.ovh.com";

pub struct OvhStockProvider {
    client: reqwest::Client,
    api_base: String,
}

impl OvhStockProvider {
    pub fn new(api_base: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DatacenterResp {
    datacenters: Vec<DatacenterStatus>,
}

/// Decode an order-rule response body. A body without a `datacenters` array
/// is an error, not an empty result.
pub fn parse_datacenters(body: &str) -> AppResult<Vec<DatacenterStatus>> {
    let resp: DatacenterResp =
        serde_json::from_str(body).map_err(|e| AppError::Fetch(format!("bad payload: {e}")))?;
    Ok(resp.datacenters)
}

/// Non-2xx is a fetch failure whatever the body says.
pub fn parse_order_rule_response(
    status: StatusCode,
    body: &str,
) -> AppResult<Vec<DatacenterStatus>> {
    if !status.is_success() {
        return Err(AppError::Fetch(format!("stock api {status}: {body}")));
    }
    parse_datacenters(body)
}

#[async_trait]
impl StockProvider for OvhStockProvider {
    async fn fetch(&self, target: &StockTarget) -> AppResult<Vec<DatacenterStatus>> {
        let url = format!("{}/v1/vps/order/rule/datacenter", self.api_base);

        let resp = self
            .client
            .get(url)
            .query(&[
                ("ovhSubsidiary", target.subsidiary()),
                ("planCode", target.plan_code()),
            ])
            .header(USER_AGENT, "stockpulse")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        parse_order_rule_response(status, &body)
    }
}
