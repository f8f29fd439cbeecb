//! Deterministic row sampling for prompt-size control.

/// Pick at most `n` rows by fixed-stride systematic sampling.
///
/// When there are no more than `n` rows, all of them are returned in order.
/// Otherwise `step = len / n` (floored) and the rows at `0, step, ..,
/// (n - 1) * step` are returned, so exactly `n` rows come back. The same
/// input always yields the same sample.
pub fn sample_rows<T>(rows: &[T], n: usize) -> Vec<&T> {
    if rows.len() <= n {
        return rows.iter().collect();
    }
    if n == 0 {
        return Vec::new();
    }

    let step = rows.len() / n;
    (0..n).map(|i| &rows[i * step]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_input_returned_unchanged() {
        let rows: Vec<u32> = (0..15).collect();
        let sample = sample_rows(&rows, 20);
        assert_eq!(sample, rows.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_exactly_n_rows() {
        let rows: Vec<u32> = (0..20).collect();
        assert_eq!(sample_rows(&rows, 20).len(), 20);
    }

    #[test]
    fn test_fixed_stride() {
        let rows: Vec<u32> = (0..1000).collect();
        let sample: Vec<u32> = sample_rows(&rows, 20).into_iter().copied().collect();
        let expected: Vec<u32> = (0..20).map(|i| i * 50).collect();
        assert_eq!(sample, expected);
    }

    #[test]
    fn test_floored_step_returns_exactly_n() {
        // 39 / 20 floors to a stride of 1.
        let rows: Vec<u32> = (0..39).collect();
        let sample: Vec<u32> = sample_rows(&rows, 20).into_iter().copied().collect();
        assert_eq!(sample, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_deterministic() {
        let rows: Vec<String> = (0..1000).map(|i| format!("row {}", i)).collect();
        assert_eq!(sample_rows(&rows, 20), sample_rows(&rows, 20));
    }

    #[test]
    fn test_zero_sample_size() {
        let rows: Vec<u32> = (0..5).collect();
        assert!(sample_rows(&rows, 0).is_empty());
    }
}
