// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! PagerMon uplink: forwards every decoded page to the server, once.

use tokio::sync::mpsc;
use tokio::time::{self, Duration};
use tracing::{info, warn};

use pgr_core::decode::DecodedPage;

use crate::pagermon::{PagerMonClient, PagerMonMessage};

const STATS_PERIOD: Duration = Duration::from_secs(60);

/// Counters reported while running and returned when the uplink stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UplinkStats {
    pub received: u64,
    pub sent: u64,
    pub send_errors: u64,
}

/// Run the PagerMon uplink task.
///
/// Each page is sent sequentially in arrival order. Failed sends are logged
/// and dropped. Returns when the page channel closes.
pub async fn run_pagermon_uplink(
    client: PagerMonClient,
    source: String,
    mut page_rx: mpsc::Receiver<DecodedPage>,
) -> UplinkStats {
    let mut stats = UplinkStats::default();
    let mut stats_tick = time::interval_at(time::Instant::now() + STATS_PERIOD, STATS_PERIOD);

    info!(
        "PagerMon uplink active ({} as {})",
        client.message_endpoint(),
        source
    );

    loop {
        tokio::select! {
            _ = stats_tick.tick() => {
                info!(
                    "PagerMon stats: received={}, sent={}, send_errors={}",
                    stats.received, stats.sent, stats.send_errors
                );
            }
            recv = page_rx.recv() => {
                let Some(page) = recv else {
                    break;
                };
                stats.received += 1;

                let message = PagerMonMessage::from_page(&page, &source);
                match client.send_message(&message).await {
                    Ok(()) => stats.sent += 1,
                    Err(err) => {
                        warn!("PagerMon send failed for {}: {}", page.address, err);
                        stats.send_errors += 1;
                    }
                }
            }
        }
    }

    info!(
        "PagerMon uplink stopped: received={}, sent={}, send_errors={}",
        stats.received, stats.sent, stats.send_errors
    );
    stats
}
