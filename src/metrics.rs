use crate::model::SolutionStats;

/// Replay progress as a whole percentage of the step sequence.
pub fn progress_percent(index: usize, len: usize) -> u8 {
    if len == 0 {
        return 0;
    }
    let pct = (index as f64 / len as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Percentage and step position on the same index basis.
pub fn progress_label(index: usize, len: usize) -> String {
    format!("{}% (step {index} of {len})", progress_percent(index, len))
}

/// Share of explored nodes that ended up on the final path.
pub fn efficiency_percent(stats: &SolutionStats) -> Option<u64> {
    if stats.nodes_explored == 0 {
        return None;
    }
    Some((stats.path_length as f64 / stats.nodes_explored as f64 * 100.0).round() as u64)
}

/// Solver wall time in seconds, four decimals.
pub fn format_execution_time(stats: &SolutionStats) -> String {
    format!("{:.4}s", stats.execution_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(nodes: u64, path: u64) -> SolutionStats {
        SolutionStats {
            nodes_explored: nodes,
            path_length: path,
            execution_time: 0.00123456,
        }
    }

    #[test]
    fn progress_rounds_against_sequence_length() {
        assert_eq!(progress_percent(0, 5), 0);
        assert_eq!(progress_percent(4, 5), 80);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn label_uses_the_percentage_index() {
        assert_eq!(progress_label(0, 5), "0% (step 0 of 5)");
        assert_eq!(progress_label(4, 5), "80% (step 4 of 5)");
        assert_eq!(progress_label(0, 0), "0% (step 0 of 0)");
    }

    #[test]
    fn efficiency_handles_no_exploration() {
        assert_eq!(efficiency_percent(&stats(40, 13)), Some(33));
        assert_eq!(efficiency_percent(&stats(5, 5)), Some(100));
        assert_eq!(efficiency_percent(&stats(0, 0)), None);
    }

    #[test]
    fn execution_time_has_four_decimals() {
        assert_eq!(format_execution_time(&stats(1, 1)), "0.0012s");
    }
}
