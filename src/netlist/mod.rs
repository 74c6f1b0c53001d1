//! Netlist reader for coordinate-keyed circuit descriptions.
//!
//! Schematic-capture exports identify nodes by the raw (x, y) coordinates of
//! component pins, so every record names its two endpoints by coordinates.
//! Records entered by hand can use any tokens as coordinates; they are only
//! compared for equality.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist  = { line }
//! line     = comment | record | empty
//! comment  = ('#' | ';') { any_char }
//! record   = kind x1 y1 x2 y2 { extra } value
//! value    = number [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Record Kinds
//!
//! | Kind | Alias | Value |
//! |------|-------|-------|
//! | resistor | R | resistance (last token) |
//! | voltage-source | E, V | EMF, 6th token; + terminal is the second endpoint |
//! | current-source | J, I | current from first to second endpoint (last token) |
//! | voltmeter | VM | orientation sign (last token) |
//! | wire | W | optional |
//! | ammeter | AM | orientation sign (last token) |
//! | wattmeter-voltage-leg | WV | orientation sign (last token) |
//! | wattmeter-current-leg | WA | orientation sign (last token) |
//! | raw-wattmeter | WM, P | orientation sign; optional offset before it |
//!
//! Records of any other kind are skipped.
//!
//! # Example
//!
//! ```text
//! # 9 V battery driving two resistors in parallel
//! E  0 0   0 40   9
//! W  0 40  40 40
//! R  40 40 40 0   10
//! R  40 40 80 0   20
//! W  80 0  40 0
//! W  40 0  0 0
//! ```

mod lexer;
mod parser;
mod record;

pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;
pub use record::{Label, RawBranch, RecordKind};

use crate::error::Result;

/// Parse netlist text into raw branches.
pub fn parse(input: &str) -> Result<Vec<RawBranch>> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Vec<RawBranch>> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::OhmsolveError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
