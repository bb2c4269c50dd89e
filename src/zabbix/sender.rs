//! Zabbix sender 프로토콜 클라이언트
//!
//! 큐에서 item을 모아 Zabbix 서버(trapper 포트)로 배치 전송합니다.
//! 프레임 형식: `ZBXD\x01` + 본문 길이(u64 LE) + JSON 본문.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::item::ZabbixItem;

/// 프로토콜 매직 바이트
const ZBX_MAGIC: &[u8; 5] = b"ZBXD\x01";

/// Sender 전송 에러
#[derive(Error, Debug)]
pub enum SenderError {
    /// TCP 연결/입출력 실패
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 연결 또는 응답 대기 타임아웃
    #[error("Zabbix server timed out after {0}s")]
    Timeout(u64),

    /// 응답 헤더가 프로토콜과 다름
    #[error("Invalid response header from Zabbix server")]
    BadHeader,

    /// 응답 본문 파싱 실패
    #[error("Failed to parse Zabbix response: {0}")]
    JsonParse(String),

    /// 서버가 실패 응답을 돌려줌
    #[error("Zabbix server rejected the batch: {0}")]
    Rejected(String),
}

/// 서버 처리 결과
#[derive(Debug, Deserialize)]
pub struct SenderResponse {
    /// "success" / "failed"
    pub response: String,
    /// 예: "processed: 18; failed: 0; total: 18; seconds spent: 0.000070"
    #[serde(default)]
    pub info: String,
}

/// Zabbix sender 프로토콜 클라이언트
#[derive(Debug, Clone)]
pub struct ZabbixSender {
    addr: String,
    timeout_secs: u64,
}

impl ZabbixSender {
    /// 새 sender 생성
    pub fn new(server: &str, port: u16, timeout_secs: u64) -> Self {
        Self {
            addr: format!("{}:{}", server, port),
            timeout_secs,
        }
    }

    /// 배치 전송
    ///
    /// 연결, 쓰기, 응답 읽기 전체가 타임아웃에 묶입니다.
    pub async fn send_batch(&self, items: &[ZabbixItem]) -> Result<SenderResponse, SenderError> {
        let frame = build_frame(items);
        let timeout = Duration::from_secs(self.timeout_secs);

        let mut stream = tokio::time::timeout(timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| SenderError::Timeout(self.timeout_secs))??;

        tokio::time::timeout(timeout, async {
            stream.write_all(&frame).await?;

            let mut header = [0u8; 13];
            stream.read_exact(&mut header).await?;
            if &header[..5] != ZBX_MAGIC {
                return Err(SenderError::BadHeader);
            }

            let body_len = u64::from_le_bytes(header[5..13].try_into().expect("13-byte header"));
            let mut body = vec![0u8; body_len as usize];
            stream.read_exact(&mut body).await?;

            let response: SenderResponse = serde_json::from_slice(&body)
                .map_err(|e| SenderError::JsonParse(e.to_string()))?;

            if response.response != "success" {
                return Err(SenderError::Rejected(response.info));
            }

            Ok(response)
        })
        .await
        .map_err(|_| SenderError::Timeout(self.timeout_secs))?
    }
}

/// 요청 프레임 생성
fn build_frame(items: &[ZabbixItem]) -> Vec<u8> {
    let body = json!({
        "request": "sender data",
        "data": items,
    })
    .to_string();

    let mut frame = Vec::with_capacity(13 + body.len());
    frame.extend_from_slice(ZBX_MAGIC);
    frame.extend_from_slice(&(body.len() as u64).to_le_bytes());
    frame.extend_from_slice(body.as_bytes());
    frame
}

/// 큐를 비우며 배치 전송하는 백그라운드 태스크
///
/// `batch_max`에 도달하거나 플러시 주기가 돌아오면 전송합니다. 전송 실패는
/// 경고만 남기고 배치를 버립니다. 카운터 값은 다음 폴링 주기에 다시 채워집니다.
pub async fn run_sender(
    mut rx: mpsc::Receiver<ZabbixItem>,
    sender: ZabbixSender,
    batch_max: usize,
    flush_interval: Duration,
) {
    let mut buffer: Vec<ZabbixItem> = Vec::with_capacity(batch_max);
    let mut ticker = tokio::time::interval(flush_interval);

    loop {
        tokio::select! {
            maybe_item = rx.recv() => match maybe_item {
                Some(item) => {
                    buffer.push(item);
                    if buffer.len() >= batch_max {
                        flush(&sender, &mut buffer).await;
                    }
                }
                None => {
                    flush(&sender, &mut buffer).await;
                    debug!("Item queue closed, sender task exiting");
                    break;
                }
            },
            _ = ticker.tick() => {
                flush(&sender, &mut buffer).await;
            }
        }
    }
}

async fn flush(sender: &ZabbixSender, buffer: &mut Vec<ZabbixItem>) {
    if buffer.is_empty() {
        return;
    }

    match sender.send_batch(buffer).await {
        Ok(response) => {
            debug!(count = buffer.len(), info = %response.info, "Batch sent");
        }
        Err(e) => {
            warn!(count = buffer.len(), error = %e, "Failed to send batch, dropping");
        }
    }

    buffer.clear();
}
