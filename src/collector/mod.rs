//! Jolokia JMX 메트릭 수집 모듈
//!
//! Flume 프로세스의 Jolokia 엔드포인트에서 JMX 속성을 읽어옵니다.
//!
//! # Example
//!
//! ```ignore
//! use flume_zabbix_exporter::collector::JolokiaClient;
//!
//! let client = JolokiaClient::new("http://localhost:8778/jolokia/", 10)?;
//! let read = client
//!     .read_mbean("org.apache.flume.channel:type=*", &["ChannelSize"])
//!     .await?;
//! ```

mod client;
mod parser;

pub use client::JolokiaClient;
pub use parser::{
    parse_read_response, qualifier_of, CollectResult, JolokiaRead, MetricValue, ReadValue,
};
