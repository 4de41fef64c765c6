use api::ComparisonResult;

use crate::core::format::format_fixed;

const FIXED_COLUMNS: [&str; 3] = ["Model", "Type", "Training Time (s)"];

/// Flat table of every model: fixed columns, then one column per metric key
/// in the order the first model reports them. Fields are written as-is and
/// lines are joined with `\n` (no trailing newline).
pub fn build_csv(result: &ComparisonResult) -> String {
    let metrics = result.metric_keys();

    let header = FIXED_COLUMNS
        .iter()
        .copied()
        .chain(metrics.iter().copied())
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(result.models.len() + 1);
    lines.push(header);

    for model in &result.models {
        let mut row = vec![
            model.name.clone(),
            model.task.to_string(),
            format_fixed(model.training_time, 3),
        ];
        row.extend(metrics.iter().map(|key| format_fixed(model.metric(key), 4)));
        lines.push(row.join(","));
    }

    lines.join("\n")
}
