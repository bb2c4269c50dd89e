//! Jolokia JSON 응답 파서
//!
//! Jolokia read 응답을 파싱하여 내부 데이터 구조로 변환합니다.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::CollectorError;

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;

/// 파싱된 Jolokia read 응답
///
/// `timestamp`는 원격 엔드포인트가 찍은 epoch 초이며, 로컬 시계로
/// 대체하지 않습니다.
#[derive(Debug, Clone)]
pub struct JolokiaRead {
    /// 응답 타임스탬프 (Unix epoch, 초)
    pub timestamp: i64,
    /// 응답 값
    pub value: ReadValue,
}

/// read 응답의 value 형태
///
/// 와일드카드 패턴 조회는 MBean ObjectName -> 속성 맵의 2단 구조,
/// 고정 ObjectName 조회는 속성 -> 값의 1단 구조로 돌아옵니다.
#[derive(Debug, Clone)]
pub enum ReadValue {
    /// 와일드카드 결과 (MBean ObjectName -> 속성 -> 값)
    Grouped(HashMap<String, HashMap<String, MetricValue>>),
    /// 단일 MBean 결과 (속성 -> 값)
    Flat(HashMap<String, MetricValue>),
}

/// 개별 속성 값
///
/// 정수와 실수를 구분해서 보존합니다. 실수만 6자리 반올림 대상이고
/// 정수 카운터는 그대로 전달되어야 하기 때문입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// 정수
    Integer(i64),
    /// 실수
    Float(f64),
    /// 문자열
    Text(String),
    /// 불리언
    Bool(bool),
}

/// 내부 파싱용 구조체
#[derive(Deserialize)]
struct RawReadResponse {
    value: Option<Value>,
    status: u16,
    timestamp: Option<i64>,
    error: Option<String>,
}

/// read 응답 파싱
pub fn parse_read_response(json: &str) -> CollectResult<JolokiaRead> {
    let raw: RawReadResponse =
        serde_json::from_str(json).map_err(|e| CollectorError::JsonParse(e.to_string()))?;

    if raw.status != 200 {
        return Err(CollectorError::JolokiaError {
            status: raw.status,
            message: raw.error.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let timestamp = raw
        .timestamp
        .ok_or_else(|| CollectorError::MalformedResponse("missing timestamp field".to_string()))?;

    let value = raw
        .value
        .ok_or_else(|| CollectorError::MalformedResponse("missing value field".to_string()))?;

    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(CollectorError::MalformedResponse(format!(
                "expected object value, got {}",
                type_name(&other)
            )))
        }
    };

    // 와일드카드 응답인지 확인 (키가 모두 MBean ObjectName 형태이고 값이 객체)
    let is_grouped = !map.is_empty()
        && map
            .iter()
            .all(|(k, v)| k.contains(':') && k.contains('=') && v.is_object());

    if is_grouped {
        let mut groups = HashMap::new();
        for (mbean, attrs) in map {
            if let Value::Object(attr_map) = attrs {
                groups.insert(mbean, parse_attribute_map(attr_map)?);
            }
        }
        Ok(JolokiaRead {
            timestamp,
            value: ReadValue::Grouped(groups),
        })
    } else {
        Ok(JolokiaRead {
            timestamp,
            value: ReadValue::Flat(parse_attribute_map(map)?),
        })
    }
}

fn parse_attribute_map(
    map: serde_json::Map<String, Value>,
) -> CollectResult<HashMap<String, MetricValue>> {
    map.into_iter()
        .map(|(k, v)| Ok((k, parse_scalar(v)?)))
        .collect()
}

fn parse_scalar(value: Value) -> CollectResult<MetricValue> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(MetricValue::Integer(i))
            } else {
                Ok(MetricValue::Float(n.as_f64().ok_or_else(|| {
                    CollectorError::JsonParse(format!(
                        "Number {} cannot be represented as f64",
                        n
                    ))
                })?))
            }
        }
        Value::String(s) => Ok(MetricValue::Text(s)),
        Value::Bool(b) => Ok(MetricValue::Bool(b)),
        other => Err(CollectorError::MalformedResponse(format!(
            "unsupported attribute value type: {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// MBean ObjectName에서 qualifier 추출
///
/// 첫 번째 ':'까지의 도메인 부분을 제거합니다.
/// 예: "org.apache.flume.channel:type=ch1" -> "type=ch1"
///
/// ':'가 없는 입력은 그대로 돌려줍니다.
pub fn qualifier_of(mbean: &str) -> &str {
    match mbean.split_once(':') {
        Some((_, qualifier)) => qualifier,
        None => mbean,
    }
}
