//! 3x3 correlation with reflect-101 borders

use ndarray::Array2;

pub(crate) type Kernel3 = [[f64; 3]; 3];

/// Map an index one step outside `0..len` back inside, mirroring around the
/// edge sample without repeating it (`dcb|abcd|cba`).
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let reflected = if index < 0 {
        -index
    } else if index > last {
        2 * last - index
    } else {
        index
    };
    reflected as usize
}

/// Correlate `plane` with a 3x3 kernel. The output has the input's shape.
pub(crate) fn correlate3x3(plane: &Array2<f64>, kernel: &Kernel3) -> Array2<f64> {
    let (rows, cols) = plane.dim();
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let mut acc = 0.0;
        for (dr, kernel_row) in kernel.iter().enumerate() {
            let src_row = reflect_101(row as isize + dr as isize - 1, rows);
            for (dc, &weight) in kernel_row.iter().enumerate() {
                if weight == 0.0 {
                    continue;
                }
                let src_col = reflect_101(col as isize + dc as isize - 1, cols);
                acc += weight * plane[[src_row, src_col]];
            }
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(0, 5), 0);
        assert_eq!(reflect_101(4, 5), 4);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(-1, 2), 1);
        assert_eq!(reflect_101(2, 2), 0);
        assert_eq!(reflect_101(-1, 1), 0);
        assert_eq!(reflect_101(1, 1), 0);
    }

    #[test]
    fn test_identity_kernel() {
        let plane = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let identity = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(correlate3x3(&plane, &identity), plane);
    }

    #[test]
    fn test_correlation_is_not_flipped() {
        // Picks the right-hand neighbour; the last column mirrors to col - 1
        let plane = array![[1.0, 2.0, 3.0]];
        let right = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]];
        assert_eq!(correlate3x3(&plane, &right), array![[2.0, 3.0, 2.0]]);
    }
}
