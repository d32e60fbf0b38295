use approx::assert_relative_eq;
use strided_lazy::{
    assign_into, ops, traverse, Expression, Function, Scalar, StridedArray, StridedView,
};

fn make_tensor(rows: usize, cols: usize) -> StridedArray<f64> {
    StridedArray::from_fn_row_major(&[rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

#[test]
fn test_transposed_view_operand() {
    let a = make_tensor(8, 5);
    let a_view = a.view();
    let a_t = a_view.permute(&[1, 0]).unwrap();

    let doubled = ops::map(&a_t, |x: f64| x * 2.0);
    let it = traverse(&doubled).unwrap();
    assert!(!it.is_linear());
    let values: Vec<f64> = it.collect();

    for i in 0..5 {
        for j in 0..8 {
            assert_relative_eq!(values[i * 8 + j], a.get(&[j, i]) * 2.0, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_mixed_strides_sum() {
    let a = make_tensor(6, 4);
    let b = make_tensor(4, 6);
    let a_view = a.view();
    let a_t = a_view.permute(&[1, 0]).unwrap();

    let mut out = StridedArray::<f64>::row_major(&[4, 6]);
    assign_into(&mut out, &ops::add(&a_t, &b)).unwrap();

    for i in 0..4 {
        for j in 0..6 {
            assert_relative_eq!(out.get(&[i, j]), a.get(&[j, i]) + b.get(&[i, j]));
        }
    }
}

#[test]
fn test_zero_stride_view_operand() {
    let row = StridedArray::from_fn_row_major(&[1, 3], |idx| idx[1] as f64 + 1.0);
    let row_view = row.view();
    let tiled = row_view.broadcast(&[4, 3]).unwrap();
    assert_eq!(tiled.strides(), &[0, 1]);

    let scaled = ops::mul(&tiled, Scalar(10.0));
    let values: Vec<f64> = traverse(&scaled).unwrap().collect();
    assert_eq!(values.len(), 12);
    for (k, v) in values.iter().enumerate() {
        assert_relative_eq!(*v, ((k % 3) as f64 + 1.0) * 10.0);
    }
}

#[test]
fn test_reversed_view_operand() {
    let data = vec![1.0, 2.0, 3.0, 4.0];
    let rev = StridedView::new(&data, &[4], &[-1], 3).unwrap();
    let fwd = StridedView::new(&data, &[4], &[1], 0).unwrap();
    let f = Function::new(|x: f64, y: f64| x - y, (&rev, &fwd));
    assert!(!f.is_trivial_broadcast(&[1]));
    assert_eq!(f.iter().collect::<Vec<_>>(), vec![3.0, 1.0, -1.0, -3.0]);
}

#[test]
fn test_offset_view_linear_path() {
    let data: Vec<f64> = (0..10).map(|x| x as f64).collect();
    let tail = StridedView::new(&data, &[2, 3], &[3, 1], 4).unwrap();
    let f = ops::add(&tail, &tail);
    let it = traverse(&f).unwrap();
    assert!(it.is_linear());
    assert_eq!(
        it.collect::<Vec<_>>(),
        vec![8.0, 10.0, 12.0, 14.0, 16.0, 18.0]
    );
}

#[test]
fn test_lower_rank_view_against_matrix() {
    let m = make_tensor(3, 4);
    let data = vec![100.0, 200.0, 300.0, 400.0];
    let v = StridedView::new(&data, &[4], &[1], 0).unwrap();
    let f = ops::sub(&v, &m);
    assert_eq!(f.shape(), vec![3, 4]);
    assert_relative_eq!(f.at(&[2, 1]), 200.0 - 9.0);
    assert_relative_eq!(f.at(&[0, 3]), 400.0 - 3.0);
}
