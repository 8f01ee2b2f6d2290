// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod decode;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use decode::DecodedPage;
