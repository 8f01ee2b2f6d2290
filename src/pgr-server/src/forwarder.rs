// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Reads multimon-ng output line by line and hands parsed pages on.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use pgr_core::decode::DecodedPage;
use pgr_core::DynResult;
use pgr_decode_log::DecodeLogger;
use pgr_multimon::parse_line;
use pgr_reporting::{PagerMonClient, PagerMonMessage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    pub lines: u64,
    pub pages: u64,
    pub rejected: u64,
}

pub async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if *shutdown_rx.borrow() {
        return;
    }
    while shutdown_rx.changed().await.is_ok() {
        if *shutdown_rx.borrow() {
            break;
        }
    }
}

/// Read lines until end of input or shutdown.
///
/// Lines that fail to parse are logged with the missing field and skipped.
/// Bytes that are not valid UTF-8 are replaced with U+FFFD before parsing.
/// Each page waits for room in `page_tx`, so a slow uplink holds the reader
/// back instead of losing pages.
pub async fn run_line_reader<R>(
    mut reader: R,
    page_tx: mpsc::Sender<DecodedPage>,
    decode_logs: Option<Arc<DecodeLogger>>,
    shutdown_rx: watch::Receiver<bool>,
) -> ForwarderStats
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ForwarderStats::default();
    let mut buf = Vec::new();
    let shutdown = wait_for_shutdown(shutdown_rx);
    tokio::pin!(shutdown);

    loop {
        buf.clear();
        tokio::select! {
            _ = &mut shutdown => break,
            read = reader.read_until(b'\n', &mut buf) => match read {
                Ok(0) => {
                    info!("End of input");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Input read failed: {}", e);
                    break;
                }
            },
        }

        let decoded = String::from_utf8_lossy(&buf);
        let line = decoded.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        match parse_line(line) {
            Ok(page) => {
                stats.pages += 1;
                debug!(
                    "{} page for {} (function {}): {}",
                    page.mode, page.address, page.function, page.alpha
                );
                if let Some(logs) = decode_logs.as_ref() {
                    logs.log_page(&page);
                }
                if page_tx.send(page).await.is_err() {
                    warn!("PagerMon uplink is gone; page dropped");
                }
            }
            Err(err) => {
                stats.rejected += 1;
                warn!("Skipping line ({}): {}", err, line);
                if let Some(logs) = decode_logs.as_ref() {
                    logs.log_rejected(line, &err.to_string());
                }
            }
        }
    }

    stats
}

/// Parse one line and send it immediately. Any failure is returned to the caller.
pub async fn send_once(client: &PagerMonClient, source: &str, line: &str) -> DynResult<()> {
    let page = parse_line(line).map_err(|e| format!("error parsing multimon-ng message: {}", e))?;
    let message = PagerMonMessage::from_page(&page, source);
    client
        .send_message(&message)
        .await
        .map_err(|e| format!("error sending message to pagermon: {}", e))?;
    info!("Sent page for {} to {}", page.address, client.message_endpoint());
    Ok(())
}
