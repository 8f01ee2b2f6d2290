// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Shared types for decoded pager messages.

use serde::{Deserialize, Serialize};

/// A page decoded from one line of multimon-ng output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPage {
    /// Decoding mode label, e.g. `POCSAG1200`
    pub mode: String,
    /// Capcode, zero-padded to 7 digits
    pub address: String,
    /// Function code as emitted by the decoder (1-2 digits, unpadded)
    pub function: String,
    /// Message text with end markers removed
    pub alpha: String,
}

impl DecodedPage {
    pub fn new(
        mode: impl Into<String>,
        address: impl Into<String>,
        function: impl Into<String>,
        alpha: impl Into<String>,
    ) -> Self {
        Self {
            mode: mode.into(),
            address: address.into(),
            function: function.into(),
            alpha: alpha.into(),
        }
    }
}
