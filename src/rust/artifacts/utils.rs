use ndarray::{Array2, ArrayViewMut1, Axis};

use super::vectorizer::Norm;

pub(crate) fn normalize_row(mut row: ArrayViewMut1<f64>, norm: Norm) {
    let length = match norm {
        Norm::L1 => row.iter().map(|x| x.abs()).sum::<f64>(),
        Norm::L2 => row.iter().map(|&x| x * x).sum::<f64>().sqrt(),
    };
    // All-zero rows stay all-zero
    if length > 0.0 {
        row.mapv_inplace(|x| x / length);
    }
}

pub(crate) fn normalize_rows(matrix: &mut Array2<f64>, norm: Norm) {
    for row in matrix.axis_iter_mut(Axis(0)) {
        normalize_row(row, norm);
    }
}

/// Index of the largest value. The first index wins on ties.
pub(crate) fn argmax(values: impl IntoIterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_l2_normalization() {
        let mut m = array![[3.0, 4.0], [0.0, 0.0]];
        normalize_rows(&mut m, Norm::L2);
        assert!((m[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((m[[0, 1]] - 0.8).abs() < 1e-12);
        assert_eq!(m[[1, 0]], 0.0);
        assert_eq!(m[[1, 1]], 0.0);
    }

    #[test]
    fn test_l1_normalization() {
        let mut m = array![[1.0, -3.0]];
        normalize_rows(&mut m, Norm::L1);
        assert!((m[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((m[[0, 1]] + 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(vec![1.0, 3.0, 3.0]), Some(1));
        assert_eq!(argmax(vec![-1.0]), Some(0));
        assert_eq!(argmax(Vec::<f64>::new()), None);
    }
}
