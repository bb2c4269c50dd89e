//! Jolokia HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.

use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::parser::{parse_read_response, CollectResult, JolokiaRead};
use crate::error::CollectorError;

/// Jolokia HTTP 클라이언트
#[derive(Clone)]
pub struct JolokiaClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

/// Jolokia read 요청 구조체
#[derive(Debug, Serialize)]
struct JolokiaRequest<'a> {
    #[serde(rename = "type")]
    request_type: &'static str,
    mbean: &'a str,
    attribute: &'a [&'a str],
}

impl JolokiaClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Jolokia 엔드포인트 URL (예: "http://localhost:8778/jolokia/")
    /// * `timeout_secs` - 요청 타임아웃 (초)
    ///
    /// # Example
    /// ```ignore
    /// let client = JolokiaClient::new("http://localhost:8778/jolokia/", 10)?;
    /// ```
    pub fn new(base_url: &str, timeout_secs: u64) -> CollectResult<Self> {
        Url::parse(base_url).map_err(|e| CollectorError::InvalidEndpoint {
            url: base_url.to_string(),
            source: e,
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(CollectorError::HttpClientInit)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timeout_secs,
        })
    }

    /// MBean 패턴 조회
    ///
    /// 와일드카드 패턴과 고정 ObjectName 모두 같은 read 요청으로 전달합니다.
    /// 사이클 내 재시도는 하지 않습니다. 실패는 다음 폴링 주기가 처리합니다.
    #[instrument(skip(self, attributes), fields(mbean = %mbean))]
    pub async fn read_mbean(
        &self,
        mbean: &str,
        attributes: &[&str],
    ) -> CollectResult<JolokiaRead> {
        let request = JolokiaRequest {
            request_type: "read",
            mbean,
            attribute: attributes,
        };

        debug!("Sending Jolokia read request");

        let response = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CollectorError::timeout_with_duration(self.timeout_secs)
                } else {
                    CollectorError::from(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CollectorError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(CollectorError::HttpResponse)?;

        parse_read_response(&body)
    }
}
