//! Error types for flume-zabbix-exporter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Collector error
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Item extraction error
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Collector 모듈 에러 타입
///
/// Jolokia 질의 한 건이 실패하는 모든 경우를 포함합니다. 어떤 변형이든
/// 해당 카테고리의 폴링만 중단시키고, 다음 카테고리는 계속 진행됩니다.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// 잘못된 엔드포인트 URL
    #[error("Invalid Jolokia endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// HTTP 요청 실패
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    /// HTTP 응답 읽기 실패
    #[error("Failed to read HTTP response: {0}")]
    HttpResponse(#[source] reqwest::Error),

    /// HTTP 상태 코드 에러
    #[error("HTTP error status: {0}")]
    HttpStatus(u16),

    /// 타임아웃
    /// The value is the configured timeout in seconds, if known.
    #[error("Request timed out{}", .0.map(|s| format!(" after {}s", s)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 실패
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// JSON 파싱 에러
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Jolokia 에러 응답 (envelope status != 200)
    #[error("Jolokia error (status {status}): {message}")]
    JolokiaError { status: u16, message: String },

    /// 응답 구조가 기대한 형태가 아님
    #[error("Malformed Jolokia response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // Timeout value is unknown when converting from reqwest::Error
            // because reqwest API doesn't expose the configured timeout duration.
            // Use CollectorError::timeout_with_duration() when the duration is known.
            CollectorError::Timeout(None)
        } else if err.is_connect() {
            CollectorError::ConnectionFailed(err.to_string())
        } else if err.is_request() {
            CollectorError::HttpRequest(err)
        } else {
            CollectorError::HttpResponse(err)
        }
    }
}

impl CollectorError {
    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(secs: u64) -> Self {
        CollectorError::Timeout(Some(secs))
    }
}

/// Item 추출 에러
///
/// 정적 카탈로그와 실제 엔드포인트 스키마가 어긋났다는 신호입니다.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 선언된 속성이 응답에 없음
    #[error("Attribute '{attribute}' missing from response for '{mbean}'")]
    MissingAttribute { mbean: String, attribute: String },

    /// 추적 중인 MBean이 응답에 없음
    #[error("MBean '{0}' missing from response")]
    MissingMBean(String),

    /// 응답 형태가 조회 모드와 맞지 않음
    #[error("Expected {expected} response shape")]
    UnexpectedShape { expected: &'static str },
}

/// Item 큐 에러
#[derive(Error, Debug)]
pub enum QueueError {
    /// 큐가 가득 참 - 해당 item 한 건만 유실, 치명적이지 않음
    #[error("Item queue is full")]
    Full,

    /// 수신 측이 종료됨
    #[error("Item queue is closed")]
    Closed,
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
