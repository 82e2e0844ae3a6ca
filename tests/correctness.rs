//! Cross-checks of the blocked and Strassen multipliers against the naive
//! reference, plus the elementwise helpers they rely on.

use matbench::source::{MatrixSource, RandomSource};
use matbench::{
    add, approximately_equal, blocked_multiply, naive_multiply, strassen_multiply, subtract,
    Blocked, MatmulError, Matrix, Multiplier, Naive, Padding, Strassen,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-9;

fn random(source: &mut RandomSource, rows: usize, cols: usize) -> Matrix {
    source.generate(rows, cols)
}

// ============================================================
// Concrete scenarios
// ============================================================

#[test]
fn test_identity_times_matrix() {
    let a = Matrix::identity(2);
    let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
    let expected = vec![vec![5.0, 6.0], vec![7.0, 8.0]];

    assert_eq!(naive_multiply(&a, &b).unwrap().to_rows(), expected);
    assert_eq!(blocked_multiply(&a, &b, 1).unwrap().to_rows(), expected);
    let strassen = strassen_multiply(&a, &b).unwrap();
    assert!(approximately_equal(&strassen, &b, TOL));
}

#[test]
fn test_3x2_times_2x4() {
    let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    let b = Matrix::from_rows(vec![
        vec![7.0, 8.0, 9.0, 10.0],
        vec![11.0, 12.0, 13.0, 14.0],
    ])
    .unwrap();
    let expected = Matrix::from_rows(vec![
        vec![29.0, 32.0, 35.0, 38.0],
        vec![65.0, 72.0, 79.0, 86.0],
        vec![101.0, 112.0, 123.0, 134.0],
    ])
    .unwrap();

    let naive = naive_multiply(&a, &b).unwrap();
    let blocked = blocked_multiply(&a, &b, 3).unwrap();
    let strassen = strassen_multiply(&a, &b).unwrap();

    assert_eq!(naive, expected);
    assert_eq!(strassen.shape(), (3, 4));
    assert!(approximately_equal(&blocked, &expected, TOL));
    assert!(approximately_equal(&strassen, &expected, TOL));
}

// ============================================================
// Blocked multiplication
// ============================================================

#[test]
fn test_blocked_matches_naive_random_shapes() {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut source = RandomSource::seeded(12345);

    for _ in 0..40 {
        let m = rng.random_range(1..=24);
        let p = rng.random_range(1..=24);
        let n = rng.random_range(1..=24);
        let a = random(&mut source, m, p);
        let b = random(&mut source, p, n);
        let reference = naive_multiply(&a, &b).unwrap();

        let largest = m.max(p).max(n);
        for block_size in [1, 2, 3, 7, largest, largest + 5] {
            let c = blocked_multiply(&a, &b, block_size).unwrap();
            assert_eq!(c.shape(), (m, n));
            assert!(
                approximately_equal(&c, &reference, TOL),
                "blocked {m}x{p} * {p}x{n} with block {block_size} diverged"
            );
        }
    }
}

#[test]
fn test_blocked_single_block_is_bit_identical() {
    let mut source = RandomSource::seeded(3);
    let a = random(&mut source, 9, 5);
    let b = random(&mut source, 5, 11);
    let c = Blocked::new(64).unwrap().multiply(&a, &b).unwrap();
    assert_eq!(c, Naive.multiply(&a, &b).unwrap());
}

// ============================================================
// Strassen multiplication
// ============================================================

#[test]
fn test_strassen_matches_naive_random_shapes() {
    let mut rng = StdRng::seed_from_u64(987);
    let mut source = RandomSource::seeded(987);

    for _ in 0..30 {
        let m = rng.random_range(1..=20);
        let p = rng.random_range(1..=20);
        let n = rng.random_range(1..=20);
        let a = random(&mut source, m, p);
        let b = random(&mut source, p, n);
        let reference = naive_multiply(&a, &b).unwrap();

        let c = strassen_multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (m, n), "result must be rows(a) x cols(b)");
        assert!(
            approximately_equal(&c, &reference, TOL),
            "strassen {m}x{p} * {p}x{n} diverged"
        );
    }
}

#[test]
fn test_strassen_square_powers_and_non_powers() {
    let mut source = RandomSource::seeded(5);
    for n in [1, 2, 3, 4, 5, 7, 8, 9, 16, 17, 31, 32] {
        let a = random(&mut source, n, n);
        let b = random(&mut source, n, n);
        let reference = naive_multiply(&a, &b).unwrap();
        let c = strassen_multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (n, n));
        assert!(approximately_equal(&c, &reference, TOL), "n={n} diverged");
    }
}

#[test]
fn test_strassen_thin_operands_per_dimension_padding() {
    let mut source = RandomSource::seeded(77);
    let strassen = Strassen::new(Padding::PerDimension, 1).unwrap();
    for (m, p, n) in [(1, 13, 1), (13, 1, 13), (2, 30, 3), (30, 2, 1), (6, 6, 6)] {
        let a = random(&mut source, m, p);
        let b = random(&mut source, p, n);
        let reference = naive_multiply(&a, &b).unwrap();
        let c = strassen.multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (m, n));
        assert!(
            approximately_equal(&c, &reference, TOL),
            "per-dimension {m}x{p} * {p}x{n} diverged"
        );
    }
}

#[test]
fn test_strassen_f32() {
    let mut source = RandomSource::seeded(11);
    let a: Matrix<f32> = source.generate(12, 7);
    let b: Matrix<f32> = source.generate(7, 10);
    let reference = naive_multiply(&a, &b).unwrap();
    let c = strassen_multiply(&a, &b).unwrap();
    assert!(approximately_equal(&c, &reference, 1e-4));
}

// ============================================================
// Dimension preconditions
// ============================================================

#[test]
fn test_all_multipliers_reject_inner_mismatch() {
    let a = Matrix::<f64>::zeros(3, 2);
    let b = Matrix::<f64>::zeros(3, 2);

    let multipliers: [Box<dyn Multiplier<f64>>; 3] = [
        Box::new(Naive),
        Box::new(Blocked::default()),
        Box::new(Strassen::default()),
    ];
    for multiplier in &multipliers {
        match multiplier.multiply(&a, &b) {
            Err(MatmulError::DimensionError { left, right, .. }) => {
                assert_eq!(left, (3, 2));
                assert_eq!(right, (3, 2));
            }
            other => panic!("{} accepted mismatched operands: {other:?}", multiplier.algorithm()),
        }
    }
}

// ============================================================
// MatrixOps
// ============================================================

#[test]
fn test_subtract_undoes_add() {
    let mut rng = StdRng::seed_from_u64(4242);
    let mut source = RandomSource::seeded(4242);
    for _ in 0..20 {
        let rows = rng.random_range(1..=12);
        let cols = rng.random_range(1..=12);
        let a = random(&mut source, rows, cols);
        let b = random(&mut source, rows, cols);
        let back = subtract(&add(&a, &b).unwrap(), &b).unwrap();
        assert!(approximately_equal(&back, &a, 1e-12));
    }
}

#[test]
fn test_approximately_equal_reflexive() {
    let mut source = RandomSource::seeded(8);
    let a = random(&mut source, 6, 9);
    for tol in [0.0, 1e-12, 1.0, f64::INFINITY] {
        assert!(approximately_equal(&a, &a, tol));
    }
}

#[test]
fn test_approximately_equal_shape_mismatch_is_false() {
    let a = Matrix::<f64>::zeros(2, 3);
    for (rows, cols) in [(3, 2), (2, 2), (1, 3), (2, 4)] {
        let b = Matrix::<f64>::zeros(rows, cols);
        assert!(!approximately_equal(&a, &b, f64::MAX));
    }
}
