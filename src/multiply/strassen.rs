//! Strassen divide-and-conquer multiplication.
//!
//! Both operands are zero-padded to power-of-two extents, multiplied
//! recursively with seven sub-products per level, and the padded result is
//! cut back to `rows(a) x cols(b)`.
//!
//! Quadrants are borrowed as strided views into the (padded) operands, so a
//! level only allocates the sums and differences fed to its sub-products,
//! the seven products themselves and its own output. Everything a level
//! allocates is dropped before it returns.

use log::debug;
use ndarray::{s, Array2, ArrayView2, CowArray, Ix2, Zip};

use super::{check_inner_dims, naive, Algorithm, Multiplier};
use crate::error::{config_error, Result};
use crate::matrix::{Element, Matrix};
use crate::ops::{add_views, sub_views};

/// How operands are enlarged before recursing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// Both operands become `s x s`, where `s` is the smallest power of two
    /// covering the largest of the four input extents. Every level splits
    /// into equal square quadrants.
    #[default]
    Shared,
    /// Each of `m`, `p` and `n` is rounded up to its own power of two.
    /// Thin operands waste less work; once any extent reaches one the
    /// remaining product is finished by the naive kernel.
    PerDimension,
}

/// Recursive seven-product multiplier.
#[derive(Debug, Clone, Copy)]
pub struct Strassen {
    padding: Padding,
    leaf_size: usize,
}

impl Strassen {
    /// # Errors
    ///
    /// Returns a configuration error if `leaf_size` is zero.
    pub fn new(padding: Padding, leaf_size: usize) -> Result<Self> {
        if leaf_size == 0 {
            return Err(config_error("strassen leaf size must be at least 1"));
        }
        Ok(Strassen { padding, leaf_size })
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Largest subproblem extent handed to the naive kernel instead of
    /// being split further. `1` recurses all the way down to scalars.
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }
}

impl Default for Strassen {
    fn default() -> Self {
        Strassen {
            padding: Padding::Shared,
            leaf_size: 1,
        }
    }
}

impl<T: Element> Multiplier<T> for Strassen {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Strassen
    }

    fn multiply(&self, a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
        check_inner_dims("strassen multiply", a, b)?;

        let (m, p) = a.shape();
        let n = b.cols();
        let (a_dims, b_dims) = padded_dims(self.padding, a.shape(), b.shape());
        debug!(
            "strassen: padding {m}x{p} * {p}x{n} to {}x{} * {}x{}",
            a_dims.0, a_dims.1, b_dims.0, b_dims.1
        );

        let a_padded = pad(a.view(), a_dims);
        let b_padded = pad(b.view(), b_dims);
        let full = recurse(a_padded.view(), b_padded.view(), self.leaf_size);

        if full.dim() == (m, n) {
            return Ok(Matrix::from_array(full));
        }
        Ok(Matrix::from_array(full.slice(s![..m, ..n]).to_owned()))
    }
}

/// Computes `a * b` with shared power-of-two padding, recursing to 1x1.
///
/// The result agrees with the naive product only up to floating-point
/// summation order; compare it with a tolerance.
///
/// # Errors
///
/// Returns a dimension error when `a.cols() != b.rows()`.
pub fn strassen_multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    Strassen::default().multiply(a, b)
}

/// Target shapes of the padded operands.
fn padded_dims(
    padding: Padding,
    (m, p): (usize, usize),
    (_, n): (usize, usize),
) -> ((usize, usize), (usize, usize)) {
    match padding {
        Padding::Shared => {
            let s = m.max(p).max(n).next_power_of_two();
            ((s, s), (s, s))
        }
        Padding::PerDimension => {
            let (m, p, n) = (
                m.next_power_of_two(),
                p.next_power_of_two(),
                n.next_power_of_two(),
            );
            ((m, p), (p, n))
        }
    }
}

/// Zero-extends `view` to `dims`, borrowing it unchanged when it already fits.
fn pad<'a, T: Element>(view: ArrayView2<'a, T>, dims: (usize, usize)) -> CowArray<'a, T, Ix2> {
    if view.dim() == dims {
        return CowArray::from(view);
    }
    let (rows, cols) = view.dim();
    let mut padded = Array2::zeros(dims);
    padded.slice_mut(s![..rows, ..cols]).assign(&view);
    CowArray::from(padded)
}

/// Multiplies power-of-two shaped `x` (m x p) and `y` (p x n).
fn recurse<T: Element>(x: ArrayView2<'_, T>, y: ArrayView2<'_, T>, leaf_size: usize) -> Array2<T> {
    let (m, p) = x.dim();
    let n = y.ncols();

    if m.max(p).max(n) <= leaf_size || m.min(p).min(n) == 1 {
        let mut c = Array2::zeros((m, n));
        naive::accumulate(x, y, c.view_mut());
        return c;
    }

    let (hm, hp, hn) = (m / 2, p / 2, n / 2);

    let a11 = x.slice(s![..hm, ..hp]);
    let a12 = x.slice(s![..hm, hp..]);
    let a21 = x.slice(s![hm.., ..hp]);
    let a22 = x.slice(s![hm.., hp..]);

    let b11 = y.slice(s![..hp, ..hn]);
    let b12 = y.slice(s![..hp, hn..]);
    let b21 = y.slice(s![hp.., ..hn]);
    let b22 = y.slice(s![hp.., hn..]);

    let m1 = recurse(
        add_views(a11, a22).view(),
        add_views(b11, b22).view(),
        leaf_size,
    );
    let m2 = recurse(add_views(a21, a22).view(), b11, leaf_size);
    let m3 = recurse(a11, sub_views(b12, b22).view(), leaf_size);
    let m4 = recurse(a22, sub_views(b21, b11).view(), leaf_size);
    let m5 = recurse(add_views(a11, a12).view(), b22, leaf_size);
    let m6 = recurse(
        sub_views(a21, a11).view(),
        add_views(b11, b12).view(),
        leaf_size,
    );
    let m7 = recurse(
        sub_views(a12, a22).view(),
        add_views(b21, b22).view(),
        leaf_size,
    );

    let mut c = Array2::zeros((m, n));
    Zip::from(c.slice_mut(s![..hm, ..hn]))
        .and(&m1)
        .and(&m4)
        .and(&m5)
        .and(&m7)
        .for_each(|c, &m1, &m4, &m5, &m7| *c = m1 + m4 - m5 + m7);
    Zip::from(c.slice_mut(s![..hm, hn..]))
        .and(&m3)
        .and(&m5)
        .for_each(|c, &m3, &m5| *c = m3 + m5);
    Zip::from(c.slice_mut(s![hm.., ..hn]))
        .and(&m2)
        .and(&m4)
        .for_each(|c, &m2, &m4| *c = m2 + m4);
    Zip::from(c.slice_mut(s![hm.., hn..]))
        .and(&m1)
        .and(&m3)
        .and(&m2)
        .and(&m6)
        .for_each(|c, &m1, &m3, &m2, &m6| *c = m1 + m3 - m2 + m6);
    c
}
