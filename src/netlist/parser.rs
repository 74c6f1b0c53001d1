//! Parser for netlist records.

use super::lexer::{parse_value, Lexer, Token, TokenKind};
use super::record::{Label, RawBranch, RecordKind};
use crate::circuit::BranchKind;
use crate::error::{OhmsolveError, Result};

/// Index of the value token in a voltage-source record.
const VOLTAGE_SOURCE_VALUE_TOKEN: usize = 5;

/// Parser for netlist records.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self { lexer }
    }

    /// Parse every record into raw branches.
    ///
    /// Lines whose kind is not recognized are skipped. Fails if nothing
    /// usable remains.
    pub fn parse(&mut self) -> Result<Vec<RawBranch>> {
        let mut branches = Vec::new();

        while let Some(tokens) = self.lexer.next_line() {
            let head = &tokens[0];
            let Some(kind) = RecordKind::from_keyword(&head.text) else {
                tracing::debug!(line = head.line, kind = %head.text, "skipping unrecognized record");
                continue;
            };

            match kind {
                RecordKind::Branch(kind) => branches.push(parse_branch(kind, &tokens)?),
                RecordKind::RawWattmeter => {
                    let [current_leg, voltage_leg] = parse_wattmeter(&tokens)?;
                    branches.push(current_leg);
                    branches.push(voltage_leg);
                }
            }
        }

        if branches.is_empty() {
            return Err(OhmsolveError::EmptyNetlist);
        }

        tracing::debug!(records = branches.len(), "parsed netlist");
        Ok(branches)
    }
}

fn parse_branch(kind: BranchKind, tokens: &[Token]) -> Result<RawBranch> {
    let line = tokens[0].line;
    let (a, b) = endpoints(tokens)?;

    let value = match kind {
        // A wire has no meaningful value, so it may be omitted
        BranchKind::Wire if tokens.len() == 5 => 0.0,
        BranchKind::VoltageSource => {
            let token = tokens.get(VOLTAGE_SOURCE_VALUE_TOKEN).ok_or_else(|| {
                OhmsolveError::parse(line, "voltage source is missing its value")
            })?;
            number(token)?
        }
        _ => {
            if tokens.len() < 6 {
                return Err(OhmsolveError::parse(
                    line,
                    format!("{} is missing its value", kind),
                ));
            }
            number(&tokens[tokens.len() - 1])?
        }
    };

    Ok(RawBranch::new(a, b, kind, value, line))
}

fn endpoints(tokens: &[Token]) -> Result<(Label, Label)> {
    if tokens.len() < 5 {
        return Err(OhmsolveError::parse(
            tokens[0].line,
            format!("expected 4 coordinates, got {}", tokens.len() - 1),
        ));
    }
    Ok((
        Label::from_tokens(&tokens[1].text, &tokens[2].text),
        Label::from_tokens(&tokens[3].text, &tokens[4].text),
    ))
}

fn number(token: &Token) -> Result<f64> {
    match (token.kind, parse_value(&token.text)) {
        (TokenKind::Number, Some(value)) => Ok(value),
        _ => Err(OhmsolveError::parse(
            token.line,
            format!("invalid number '{}' at column {}", token.text, token.column),
        )),
    }
}

fn integer(token: &Token) -> Result<i64> {
    token.text.parse::<i64>().map_err(|_| {
        OhmsolveError::parse(
            token.line,
            format!("wattmeter coordinate must be an integer, got {}", token.text),
        )
    })
}

/// Split a raw wattmeter `A -> B` into its two legs.
///
/// The current leg runs from A to the sense point B. The voltage leg runs
/// from B to a terminal P offset perpendicular to AB, by the optional offset
/// token or by |AB|.
fn parse_wattmeter(tokens: &[Token]) -> Result<[RawBranch; 2]> {
    let line = tokens[0].line;
    if tokens.len() < 6 {
        return Err(OhmsolveError::parse(line, "wattmeter is missing its value"));
    }

    let x1 = integer(&tokens[1])?;
    let y1 = integer(&tokens[2])?;
    let x2 = integer(&tokens[3])?;
    let y2 = integer(&tokens[4])?;
    let sign = number(&tokens[tokens.len() - 1])?;

    let offset = if tokens.len() >= 7 {
        Some(integer(&tokens[5])?)
    } else {
        None
    };

    let out_of_range = || OhmsolveError::parse(line, "wattmeter coordinates out of range");
    let span = |from: i64, to: i64| to.checked_sub(from).and_then(i64::checked_abs);

    let terminal = match (x1 == x2, y1 == y2) {
        (false, true) => {
            let d = offset.or_else(|| span(x1, x2)).ok_or_else(out_of_range)?;
            Label::at(x2, y2.checked_add(d).ok_or_else(out_of_range)?)
        }
        (true, false) => {
            let d = offset.or_else(|| span(y1, y2)).ok_or_else(out_of_range)?;
            Label::at(x2.checked_add(d).ok_or_else(out_of_range)?, y2)
        }
        _ => {
            return Err(OhmsolveError::parse(
                line,
                format!(
                    "wattmeter from ({}, {}) to ({}, {}) is neither horizontal nor vertical",
                    x1, y1, x2, y2
                ),
            ));
        }
    };

    let a = Label::at(x1, y1);
    let b = Label::at(x2, y2);
    Ok([
        RawBranch::new(a, b.clone(), BranchKind::WattmeterCurrent, sign, line),
        RawBranch::new(b, terminal, BranchKind::WattmeterVoltage, 1.0, line),
    ])
}
