//! Zabbix 연동 모듈
//!
//! Item 모델, 폴러와 sender 태스크 사이의 큐, sender 프로토콜 클라이언트를
//! 제공합니다.

mod item;
mod queue;
mod sender;

pub use item::{discovery_payload, ItemValue, ZabbixItem};
pub use queue::ItemQueue;
pub use sender::{run_sender, SenderError, SenderResponse, ZabbixSender};
