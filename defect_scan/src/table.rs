use pixel_defects::DefectReport;

/// Renders the report as a fixed-width console table followed by per-method totals.
pub fn format_report(report: &DefectReport) -> String {
    let mut out = String::new();

    let method_names: Vec<String> = report.methods.iter().map(|m| m.to_string()).collect();
    let column_width = method_names
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);

    out.push_str(&format!("{:>6} {:>6} {:>10}", "row", "col", "confidence"));
    for name in &method_names {
        out.push_str(&format!(" {name:>column_width$}"));
    }
    out.push('\n');

    for record in &report.records {
        out.push_str(&format!(
            "{:>6} {:>6} {:>10.2}",
            record.y, record.x, record.confidence
        ));
        for &method in &report.methods {
            let mark = if record.flagged_by(method) { "x" } else { "." };
            out.push_str(&format!(" {mark:>column_width$}"));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n{} defective pixels in {}x{} (threshold {:.1})\n",
        report.len(),
        report.width,
        report.height,
        report.threshold
    ));
    for (method, count) in report.count_by_method() {
        out.push_str(&format!("  {:<column_width$} {count}\n", method.to_string()));
    }

    out
}
