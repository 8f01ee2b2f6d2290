// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod pagermon;
pub mod uplink;

#[cfg(test)]
mod test_server;

pub use pagermon::{PagerMonClient, PagerMonClientConfig, PagerMonMessage, SendError};
pub use uplink::{run_pagermon_uplink, UplinkStats};
