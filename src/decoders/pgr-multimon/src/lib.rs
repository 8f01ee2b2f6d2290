// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Parser for multimon-ng POCSAG/FLEX text output.
//!
//! A typical line looks like:
//!
//! ```text
//! POCSAG1200: Address: 1234567  Function: 0  Alpha:   Some text<EOT><NUL>
//! ```
//!
//! [`parse_line`] turns one such line into a [`DecodedPage`]. The address,
//! function and alpha fields are required; the mode prefix is best-effort.

use std::num::ParseIntError;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use pgr_core::decode::DecodedPage;

/// Capcodes are at most 7 digits.
const ADDRESS_PATTERN: &str = r"Address: ([0-9]{1,7})(?:[^0-9]|$)";
/// Observed function codes are 0-3; two digits is the widest accepted.
const FUNCTION_PATTERN: &str = r"Function: ([0-9]{1,2})(?:[^0-9]|$)";
const ALPHA_PATTERN: &str = r"Alpha: (.*)";

const ADDRESS_WIDTH: usize = 7;
const END_MARKERS: [&str; 2] = ["<EOT>", "<NUL>"];

/// Reason a line could not be turned into a [`DecodedPage`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("address not found")]
    AddressNotFound,

    #[error("function not found")]
    FunctionNotFound,

    #[error("alpha not found")]
    AlphaNotFound,

    #[error("invalid address: {0}")]
    AddressFormat(#[source] ParseIntError),
}

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ADDRESS_PATTERN).expect("address pattern is valid"))
}

fn function_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FUNCTION_PATTERN).expect("function pattern is valid"))
}

fn alpha_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ALPHA_PATTERN).expect("alpha pattern is valid"))
}

/// Parse one line of multimon-ng output.
///
/// Required fields are checked in order address, function, alpha and the
/// first missing one is reported.
pub fn parse_line(line: &str) -> Result<DecodedPage, ParseError> {
    let mode = parse_mode(line);
    let address = parse_address(line)?;
    let function = parse_function(line)?;
    let alpha = parse_alpha(line)?;

    Ok(DecodedPage::new(mode, address, function, alpha))
}

/// Return the text before the first `:`, or the whole line when there is none.
pub fn parse_mode(line: &str) -> &str {
    line.split_once(':').map(|(mode, _)| mode).unwrap_or(line)
}

fn parse_address(line: &str) -> Result<String, ParseError> {
    let digits = address_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::AddressNotFound)?;
    let capcode: i64 = digits
        .as_str()
        .parse()
        .map_err(ParseError::AddressFormat)?;
    Ok(format!("{:0width$}", capcode, width = ADDRESS_WIDTH))
}

fn parse_function(line: &str) -> Result<String, ParseError> {
    function_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::FunctionNotFound)
}

fn parse_alpha(line: &str) -> Result<String, ParseError> {
    let raw = alpha_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::AlphaNotFound)?;
    Ok(trim_end_markers(raw.as_str().trim_start_matches(' ')).to_string())
}

/// Strip trailing `<EOT>` / `<NUL>` markers in any order and count.
pub fn trim_end_markers(mut input: &str) -> &str {
    while let Some(stripped) = END_MARKERS
        .iter()
        .find_map(|marker| input.strip_suffix(marker))
    {
        input = stripped;
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "POCSAG1200: Address: 1234567  Function: 0  Alpha:   Aid - Emergency; *FTAC - 1*;  Test Emergency Location; 7xxx Test Rd NE, RM; A1; 47.0;-122.0<EOT><NUL>";

    #[test]
    fn parses_sample_line() {
        let page = parse_line(SAMPLE).expect("sample must parse");
        assert_eq!(
            page,
            DecodedPage::new(
                "POCSAG1200",
                "1234567",
                "0",
                "Aid - Emergency; *FTAC - 1*;  Test Emergency Location; 7xxx Test Rd NE, RM; A1; 47.0;-122.0",
            )
        );
    }

    #[test]
    fn address_is_zero_padded() {
        let page = parse_line("POCSAG512: Address: 42  Function: 1  Alpha: hi").unwrap();
        assert_eq!(page.address, "0000042");

        for digits in ["0", "7", "123", "000001", "9999999"] {
            let line = format!("POCSAG512: Address: {digits}  Function: 1  Alpha: x");
            let page = parse_line(&line).unwrap();
            assert_eq!(page.address.len(), 7);
            let expected: i64 = digits.parse().unwrap();
            assert_eq!(page.address, format!("{expected:07}"));
        }
    }

    #[test]
    fn address_at_end_of_line_matches() {
        let page = parse_line("Function: 2 Alpha: text Address: 5").unwrap();
        assert_eq!(page.address, "0000005");
        assert_eq!(page.alpha, "text Address: 5");
    }

    #[test]
    fn missing_address_reported_first() {
        for line in [
            "POCSAG1200: Function: 0  Alpha: hello",
            "POCSAG1200: Alpha: hello",
            "POCSAG1200:",
            "",
        ] {
            assert!(
                matches!(parse_line(line), Err(ParseError::AddressNotFound)),
                "line {line:?}"
            );
        }
    }

    #[test]
    fn eight_digit_address_is_not_truncated() {
        let err = parse_line("POCSAG1200: Address: 12345678  Function: 0  Alpha: x").unwrap_err();
        assert!(matches!(err, ParseError::AddressNotFound));
    }

    #[test]
    fn missing_function() {
        let err = parse_line("POCSAG1200: Address: 1234567  Alpha: hello").unwrap_err();
        assert!(matches!(err, ParseError::FunctionNotFound));
        assert_eq!(err.to_string(), "function not found");
    }

    #[test]
    fn function_is_unpadded() {
        let page = parse_line("POCSAG2400: Address: 1  Function: 99  Alpha: x").unwrap();
        assert_eq!(page.function, "99");
        let page = parse_line("POCSAG2400: Address: 1  Function: 3  Alpha: x").unwrap();
        assert_eq!(page.function, "3");
    }

    #[test]
    fn three_digit_function_does_not_match() {
        let err = parse_line("POCSAG2400: Address: 1  Function: 100  Alpha: x").unwrap_err();
        assert!(matches!(err, ParseError::FunctionNotFound));
    }

    #[test]
    fn missing_alpha() {
        let err = parse_line("POCSAG1200: Address: 1234567  Function: 0  Numeric: 123").unwrap_err();
        assert!(matches!(err, ParseError::AlphaNotFound));
    }

    #[test]
    fn address_format_error_wraps_parse_int() {
        let source = "x".parse::<i64>().unwrap_err();
        let err = ParseError::AddressFormat(source);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("invalid address"));
    }

    #[test]
    fn leading_spaces_removed() {
        for pad in ["", " ", "      "] {
            let line = format!("POCSAG512: Address: 1  Function: 0  Alpha: {pad}msg");
            assert_eq!(parse_line(&line).unwrap().alpha, "msg");
        }
    }

    #[test]
    fn trailing_markers_collapse() {
        let page = parse_line("POCSAG512: Address: 1  Function: 0  Alpha:   hello<NUL><EOT><NUL>").unwrap();
        assert_eq!(page.alpha, "hello");
    }

    #[test]
    fn trim_end_markers_any_combination() {
        let suffixes = ["", "<EOT>", "<NUL>", "<EOT><NUL>", "<NUL><NUL><EOT>", "<EOT><EOT><NUL><EOT>"];
        for s in ["hello", "a<EOT>b", ""] {
            for suffix in suffixes {
                let input = format!("{s}{suffix}");
                assert_eq!(trim_end_markers(&input), s, "input {input:?}");
            }
        }
    }

    #[test]
    fn trim_end_markers_keeps_inner_markers() {
        assert_eq!(trim_end_markers("<EOT>text"), "<EOT>text");
        assert_eq!(trim_end_markers("text<EOT "), "text<EOT ");
    }

    #[test]
    fn mode_before_first_colon() {
        assert_eq!(parse_mode("POCSAG1200: Address: 1"), "POCSAG1200");
        assert_eq!(parse_mode("FLEX|1600: a: b: c"), "FLEX|1600");
        assert_eq!(parse_mode("no colon here"), "no colon here");
        assert_eq!(parse_mode(""), "");
    }

    #[test]
    fn mode_without_colon_is_whole_line() {
        let line = "Address 1 Function 0 Alpha x";
        assert_eq!(parse_mode(line), line);
    }
}
