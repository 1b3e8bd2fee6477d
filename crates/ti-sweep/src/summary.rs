//! ASCII summary table, ported from `generate_summary_text`.

use crate::grid::SweepPoint;

const EM_DASH: &str = "\u{2014}";

/// Render the fixed-width ASCII table used for `pareto_summary.txt`.
pub fn generate_summary_text(points: &[SweepPoint]) -> String {
    let header = format!(
        "{:>6} {:>8} {:>14} {:>12} {:>10} {}",
        "ROI%", "NonROI%", "ROI thr(V/m)", "NR thr(V/m)", "Score", "Status"
    );
    let separator = "=".repeat(header.chars().count());

    let mut lines = Vec::with_capacity(points.len() + 2);
    lines.push(header);
    lines.push(separator);
    for point in points {
        let score_str = match point.focality_score {
            Some(score) => format!("{score:.3}"),
            None => EM_DASH.to_string(),
        };
        lines.push(format!(
            "{:>6} {:>8} {:>14.4} {:>12.4} {:>10} {}",
            point.roi_pct,
            point.nonroi_pct,
            point.roi_threshold_vm,
            point.nonroi_threshold_vm,
            score_str,
            point.status,
        ));
    }
    lines.join("\n")
}
