//! Human-readable report of a solved circuit.
//!
//! ```text
//! I_0_2_1 = 900.000 mA
//! I_2_0_2 = 900.000 mA
//! Uv_1 = 9.000 V
//! Ia_1 = 900.000 mA
//! Pw_1 = 8100.000 mW
//! ```

use std::io::Write;

use crate::error::{OhmsolveError, Result};
use crate::solver::Solution;

/// Amperes to milliamperes, watts to milliwatts.
const MILLI: f64 = 1e3;

/// Magnitudes below this, in display units, are printed as zero.
pub const DISPLAY_ZERO_THRESHOLD: f64 = 0.0005;

/// Write one line per branch current and meter reading.
pub fn write_report<W: Write>(solution: &Solution, writer: &mut W) -> Result<()> {
    let mut line = |text: String| {
        writeln!(writer, "{}", text).map_err(|e| OhmsolveError::ReportWriteError {
            message: e.to_string(),
        })
    };

    for current in solution.branch_currents() {
        line(format!(
            "{} = {} mA",
            current.branch.current_label(),
            format_value(current.current * MILLI)
        ))?;
    }
    for (n, voltage) in solution.voltmeter_readings().iter().enumerate() {
        line(format!("Uv_{} = {} V", n + 1, format_value(*voltage)))?;
    }
    for (n, current) in solution.ammeter_readings().iter().enumerate() {
        line(format!("Ia_{} = {} mA", n + 1, format_value(current * MILLI)))?;
    }
    for (n, reading) in solution.wattmeter_readings().iter().enumerate() {
        line(format!(
            "Pw_{} = {} mW",
            n + 1,
            format_value(reading.power() * MILLI)
        ))?;
    }
    Ok(())
}

/// Render the report into a string.
pub fn report_string(solution: &Solution) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(solution, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| OhmsolveError::ReportWriteError {
        message: e.to_string(),
    })
}

/// Format a value already scaled to display units with three decimals.
///
/// Anything that would round to zero prints as `0.000`, never `-0.000`.
pub fn format_value(value: f64) -> String {
    if value.abs() < DISPLAY_ZERO_THRESHOLD {
        "0.000".to_string()
    } else {
        format!("{:.3}", value)
    }
}
