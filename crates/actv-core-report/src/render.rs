use crate::bench::BenchReport;
use crate::check::CheckReport;
use std::fmt::Write;

pub fn render_check(report: &CheckReport) -> String {
    let mut s = format!("{} fast vs ref:\n", report.activation);
    for row in &report.rows {
        let _ = writeln!(
            s,
            "  {}({:.4}) = {:.4} / {:.4}  (diff {:.2e})",
            report.activation, row.x, row.fast, row.reference, row.abs_diff
        );
    }
    let _ = write!(
        s,
        "  max diff: {:.2e} (tol {:.2e}) -> {}",
        report.max_abs_diff,
        report.tolerance,
        if report.passed { "ok" } else { "FAIL" }
    );
    s
}

pub fn render_bench(report: &BenchReport) -> String {
    format!(
        "{}{}: {} x {}\n  time: {:.3} ms\n  time/iter: {:.1} ns\n  time/elem: {:.3} ns\n  throughput: {:.1} million elements/sec",
        report.kernel,
        if report.parallel { " (parallel)" } else { "" },
        report.size,
        report.iters,
        report.total_ns as f64 / 1e6,
        report.ns_per_iter,
        report.ns_per_elem,
        report.melem_per_sec
    )
}
