//! End-to-end tests: netlist text in, currents and meter readings out.

use approx::assert_abs_diff_eq;
use ohmsolve_core::circuit::{reduce, NodeId, ReductionMode};
use ohmsolve_core::netlist::{self, Label};
use ohmsolve_core::report::report_string;
use ohmsolve_core::{Circuit, OhmsolveError, Solution, SolverConfig};

/// Helper: parse + reduce + solve with node 1 as reference
fn dc_solve(netlist: &str) -> Solution {
    dc_solve_with_reference(netlist, 1)
}

fn dc_solve_with_reference(netlist: &str, reference: usize) -> Solution {
    let records = netlist::parse(netlist).expect("parse failed");
    let mut circuit = Circuit::from_netlist(&records).expect("circuit construction failed");
    circuit
        .set_reference_node(reference)
        .expect("reference out of range");
    circuit
        .solve(&SolverConfig::default())
        .expect("DC solve failed")
        .clone()
}

/// Canonical node id of the point (x, y)
fn node_at(netlist: &str, x: i64, y: i64) -> NodeId {
    let records = netlist::parse(netlist).expect("parse failed");
    reduce(&records, ReductionMode::Solve).nodes[&Label::at(x, y)]
}

fn currents(solution: &Solution) -> Vec<f64> {
    solution
        .branch_currents()
        .iter()
        .map(|c| c.current)
        .collect()
}

// ── Basic circuits ────────────────────────────────────────────────

#[test]
fn test_series_loop() {
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 80 40 100
R 80 40 80 0 200
W 80 0 0 0
";
    let solution = dc_solve(netlist);

    // I = E / (R1 + R2) everywhere in the loop
    for current in currents(&solution) {
        assert_abs_diff_eq!(current, 0.03, epsilon = 1e-12);
    }

    let mid = node_at(netlist, 80, 40);
    assert_abs_diff_eq!(solution.voltage(mid), 6.0, epsilon = 1e-9);
}

#[test]
fn test_parallel_resistors() {
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
R 40 40 40 0 20
W 40 0 0 0
";
    let solution = dc_solve(netlist);
    let i = currents(&solution);
    assert_abs_diff_eq!(i[0], 1.35, epsilon = 1e-12);
    assert_abs_diff_eq!(i[1], 0.9, epsilon = 1e-12);
    assert_abs_diff_eq!(i[2], 0.45, epsilon = 1e-12);

    // Source and both resistors share one node pair
    let labels: Vec<String> = solution
        .branch_currents()
        .iter()
        .map(|c| c.branch.current_label())
        .collect();
    assert_eq!(labels, vec!["I_0_2_1", "I_2_0_2", "I_2_0_3"]);
}

#[test]
fn test_source_polarity() {
    // The second endpoint is the + terminal
    let forward = "\
E 0 0 0 40 5
R 0 40 0 0 1k
";
    let a = node_at(forward, 0, 0);
    let b = node_at(forward, 0, 40);
    let solution = dc_solve(forward);
    assert_abs_diff_eq!(
        solution.voltage(b) - solution.voltage(a),
        5.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(currents(&solution)[1], 5e-3, epsilon = 1e-15);

    // A negative value flips the terminals
    let reversed = "\
E 0 0 0 40 -5
R 0 40 0 0 1k
";
    let solution = dc_solve(reversed);
    assert_abs_diff_eq!(
        solution.voltage(b) - solution.voltage(a),
        -5.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(currents(&solution)[1], -5e-3, epsilon = 1e-15);
}

#[test]
fn test_current_source_drives_resistor() {
    // 2 mA pushed from (0,0) to (0,40), returning through 1k
    let netlist = "\
J 0 0 0 40 2m
R 0 40 0 0 1k
";
    let solution = dc_solve(netlist);
    let top = node_at(netlist, 0, 40);
    assert_abs_diff_eq!(solution.voltage(top), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(currents(&solution)[1], 2e-3, epsilon = 1e-12);
}

#[test]
fn test_kirchhoff_current_law_at_every_node() {
    let netlist = "\
J 0 0 0 40 2
R 0 40 40 40 5
R 40 40 40 0 10
R 0 40 40 0 20
R 40 0 0 0 4
R 0 0 40 40 8
E 40 40 0 0 3
";
    let records = netlist::parse(netlist).unwrap();
    let circuit = Circuit::from_netlist(&records).unwrap();
    let node_count = circuit.node_count();

    for reference in 1..=node_count {
        let solution = dc_solve_with_reference(netlist, reference);
        for node in 0..=node_count {
            let net: f64 = solution
                .branch_currents()
                .iter()
                .map(|c| c.branch.outflow(NodeId(node), c.current))
                .sum();
            assert_abs_diff_eq!(net, 0.0, epsilon = 1e-9);
        }

        // The voltage source holds its terminals apart
        let a = node_at(netlist, 0, 0);
        let c = node_at(netlist, 40, 40);
        assert_abs_diff_eq!(
            solution.voltage(a) - solution.voltage(c),
            3.0,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_reference_change_shifts_voltages_only() {
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
R 40 40 80 40 20
R 80 40 80 0 30
W 80 0 40 0
W 40 0 0 0
";
    let base = dc_solve_with_reference(netlist, 1);
    let shifted = dc_solve_with_reference(netlist, 3);
    assert_eq!(shifted.reference(), NodeId(3));

    let canonical = |s: &Solution| -> Vec<f64> {
        s.branch_currents()
            .iter()
            .map(|c| c.canonical_current())
            .collect()
    };
    for (a, b) in canonical(&base).iter().zip(canonical(&shifted)) {
        assert_abs_diff_eq!(*a, b, epsilon = 1e-12);
    }

    let offset = base.node_voltages()[2];
    assert_abs_diff_eq!(shifted.node_voltages()[2], 0.0);
    for (a, b) in base.node_voltages().iter().zip(shifted.node_voltages()) {
        assert_abs_diff_eq!(a - offset, *b, epsilon = 1e-12);
    }
}

// ── Meters ────────────────────────────────────────────────────────

#[test]
fn test_series_ammeter() {
    let netlist = "\
E 0 0 0 40 9
AM 0 40 40 40 1
R 40 40 40 0 10
W 40 0 0 0
";
    let solution = dc_solve(netlist);
    assert_eq!(solution.ammeter_readings().len(), 1);
    assert_abs_diff_eq!(solution.ammeter_readings()[0], 0.9, epsilon = 1e-12);

    // A reversed meter reads negative
    let flipped = netlist.replace("AM 0 40 40 40 1", "AM 0 40 40 40 -1");
    let solution = dc_solve(&flipped);
    assert_abs_diff_eq!(solution.ammeter_readings()[0], -0.9, epsilon = 1e-12);
}

#[test]
fn test_junction_ammeter() {
    // The meter sits between two junctions, each with two other branches
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
AM 40 40 80 40 1
R 80 40 80 0 20
R 80 40 80 0 20
W 80 0 40 0
W 40 0 0 0
";
    let solution = dc_solve(netlist);
    assert_abs_diff_eq!(solution.ammeter_readings()[0], 0.9, epsilon = 1e-12);
}

#[test]
fn test_voltmeter_reading() {
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
W 40 0 0 0
VM 40 40 40 0 1
VM 40 40 40 0 -1
";
    let solution = dc_solve(netlist);
    assert_eq!(solution.voltmeter_readings(), &[9.0, -9.0]);

    // Meters draw no current
    assert_eq!(solution.branch_currents().len(), 2);
}

#[test]
fn test_wattmeter_power() {
    let netlist = "\
E 0 80 0 40 9
WM 0 40 40 40 1
R 40 40 40 80 10
W 40 80 0 80
";
    let solution = dc_solve(netlist);
    let readings = solution.wattmeter_readings();
    assert_eq!(readings.len(), 1);
    assert_abs_diff_eq!(readings[0].current, 0.9, epsilon = 1e-12);
    assert_abs_diff_eq!(readings[0].voltage, 9.0, epsilon = 1e-12);
    assert_abs_diff_eq!(readings[0].power(), 8.1, epsilon = 1e-12);
}

#[test]
fn test_meter_shorted_by_wire_reads_zero() {
    // The wire joins the ammeter's terminals, so no current flows through it
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
AM 0 40 40 40 1
R 40 40 40 0 10
W 40 0 0 0
";
    let solution = dc_solve(netlist);
    assert_abs_diff_eq!(solution.ammeter_readings()[0], 0.0);
    assert_abs_diff_eq!(currents(&solution)[1], 0.9, epsilon = 1e-12);
}

#[test]
fn test_explicit_wattmeter_legs() {
    let netlist = "\
E 0 80 0 40 9
WA 0 40 40 40 1
WV 40 40 40 80 1
R 40 40 40 80 10
W 40 80 0 80
";
    let solution = dc_solve(netlist);
    let readings = solution.wattmeter_readings();
    assert_eq!(readings.len(), 1);
    assert_abs_diff_eq!(readings[0].power(), 8.1, epsilon = 1e-12);
}

#[test]
fn test_unpaired_wattmeter_legs_are_ignored() {
    // A second voltage leg with no current leg to pair with
    let extra_voltage = "\
E 0 80 0 40 9
WA 0 40 40 40 1
WV 40 40 40 80 -1
R 40 40 40 80 10
W 40 80 0 80
WV 0 40 0 80 1
";
    let solution = dc_solve(extra_voltage);
    let readings = solution.wattmeter_readings();
    assert_eq!(readings.len(), 1);
    assert_abs_diff_eq!(readings[0].voltage, -9.0, epsilon = 1e-12);
    assert_abs_diff_eq!(readings[0].power(), -8.1, epsilon = 1e-12);

    // A current leg alone produces no reading
    let lone_current = "\
E 0 0 0 40 9
WA 0 40 40 40 1
R 40 40 40 0 10
W 40 0 0 0
";
    let solution = dc_solve(lone_current);
    assert!(solution.wattmeter_readings().is_empty());
    assert!(solution.ammeter_readings().is_empty());
}

#[test]
fn test_meter_readings_independent_of_reference() {
    let ammeters = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
AM 40 40 80 40 1
R 80 40 80 0 20
AM 80 40 120 40 -1
R 120 40 120 0 20
W 120 0 80 0
W 80 0 40 0
W 40 0 0 0
";
    let wattmeter = "\
E 0 80 0 40 9
WM 0 40 40 40 1
R 40 40 40 80 10
W 40 80 0 80
";
    for reference in 1..=2 {
        let solution = dc_solve_with_reference(ammeters, reference);
        assert_eq!(solution.ammeter_readings().len(), 2);
        assert_abs_diff_eq!(solution.ammeter_readings()[0], 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(solution.ammeter_readings()[1], -0.45, epsilon = 1e-12);

        let solution = dc_solve_with_reference(wattmeter, reference);
        let reading = solution.wattmeter_readings()[0];
        assert_abs_diff_eq!(reading.current, 0.9, epsilon = 1e-12);
        assert_abs_diff_eq!(reading.voltage, 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reading.power(), 8.1, epsilon = 1e-12);
    }
}

// ── Errors ────────────────────────────────────────────────────────

#[test]
fn test_floating_subcircuit_is_singular() {
    let netlist = "\
E 0 0 0 40 9
W 0 40 40 40
R 40 40 40 0 10
W 40 0 0 0
R 100 100 100 200 5
";
    let records = netlist::parse(netlist).unwrap();
    let mut circuit = Circuit::from_netlist(&records).unwrap();
    assert!(matches!(
        circuit.solve(&SolverConfig::default()),
        Err(OhmsolveError::SingularMatrix)
    ));
    assert!(matches!(circuit.solution(), Err(OhmsolveError::NotSolved)));
}

#[test]
fn test_conflicting_parallel_sources_are_singular() {
    let netlist = "\
E 0 0 0 40 9
E 0 0 0 40 5
R 0 40 0 0 10
";
    let records = netlist::parse(netlist).unwrap();
    let mut circuit = Circuit::from_netlist(&records).unwrap();
    assert!(matches!(
        circuit.solve(&SolverConfig::default()),
        Err(OhmsolveError::SingularMatrix)
    ));
}

#[test]
fn test_reference_out_of_range() {
    let records = netlist::parse("E 0 0 0 40 9\nR 0 40 0 0 10\n").unwrap();
    let mut circuit = Circuit::from_netlist(&records).unwrap();
    assert!(matches!(
        circuit.set_reference_node(3),
        Err(OhmsolveError::ReferenceOutOfRange {
            node: 3,
            node_count: 2
        })
    ));
}

// ── Report ────────────────────────────────────────────────────────

#[test]
fn test_report_end_to_end() {
    let netlist = "\
; battery, ammeter, resistor and a voltmeter across it
E 0 0 0 40 9
AM 0 40 40 40 1
R 40 40 40 0 10
W 40 0 0 0
VM 40 40 40 0 1
";
    let solution = dc_solve(netlist);
    let report = report_string(&solution).unwrap();
    assert_eq!(
        report,
        "\
I_0_2_1 = 900.000 mA
I_2_0_2 = 900.000 mA
Uv_1 = 9.000 V
Ia_1 = 900.000 mA
"
    );
}
