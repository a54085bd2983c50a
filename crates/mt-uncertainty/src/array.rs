//! [`UncertainArray`]: a shaped, row-major collection of [`Uncertain`]
//! elements.
//!
//! Broadcasting is numpy-style but deliberately narrow: a shape-`[]` array
//! (a scalar) broadcasts against any shape, and any two non-scalar operands
//! must have identical shapes.

use std::fmt;

use mt_core::{ensure, fail, Error, Magnitude, Real, Result, Settings};

use crate::uncertain::{literal_label, unnamed_key};
use crate::{BinaryOp, Contributions, Function, Identity, Uncertain};

/// An array of uncertainty values.
#[derive(Debug, Clone, PartialEq)]
pub struct UncertainArray {
    shape: Vec<usize>,
    data: Vec<Uncertain>,
}

impl UncertainArray {
    /// One-dimensional array of independent leaves.
    ///
    /// With a `name`, element `i` is labelled `name[i]`; otherwise each
    /// element is labelled by its value.
    pub fn new(values: &[Real], uncertainties: &[Real], name: Option<&str>) -> Result<Self> {
        check_lengths(values, uncertainties)?;
        let data = values
            .iter()
            .zip(uncertainties)
            .enumerate()
            .map(|(i, (&v, &u))| element_leaf(name, i, v, u, Identity::fresh()))
            .collect();
        Ok(Self::from_elements(data))
    }

    /// One-dimensional array whose elements all share one identity, so any
    /// two of them combine as fully correlated.
    pub fn correlated(values: &[Real], uncertainties: &[Real], name: Option<&str>) -> Result<Self> {
        check_lengths(values, uncertainties)?;
        let identity = Identity::fresh();
        let data = values
            .iter()
            .zip(uncertainties)
            .enumerate()
            .map(|(i, (&v, &u))| element_leaf(name, i, v, u, identity))
            .collect();
        Ok(Self::from_elements(data))
    }

    /// Exact values (zero uncertainty, empty ledgers).
    pub fn constants(values: &[Real]) -> Self {
        Self::from_elements(values.iter().map(|&v| Uncertain::constant(v)).collect())
    }

    /// One-dimensional array from existing elements.
    pub fn from_elements(data: Vec<Uncertain>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Zero-dimensional array holding one value.
    pub fn scalar(value: Uncertain) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// Same elements viewed with a new row-major shape.
    pub fn reshape(self, shape: &[usize]) -> Result<Self> {
        let size: usize = shape.iter().product();
        if size != self.data.len() {
            return Err(Error::ShapeMismatch {
                left: self.shape,
                right: shape.to_vec(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            data: self.data,
        })
    }

    /// Shape of the array (`[]` for a scalar).
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` for a zero-dimensional array.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Element at flat (row-major) index `i`.
    pub fn get(&self, i: usize) -> Option<&Uncertain> {
        self.data.get(i)
    }

    /// Element at `(row, col)` of a two-dimensional array.
    pub fn get2(&self, row: usize, col: usize) -> Option<&Uncertain> {
        match self.shape.as_slice() {
            [rows, cols] if row < *rows && col < *cols => self.data.get(row * cols + col),
            _ => None,
        }
    }

    /// Elements in row-major order.
    pub fn as_slice(&self) -> &[Uncertain] {
        &self.data
    }

    /// Iterator over elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Uncertain> {
        self.data.iter()
    }

    /// Best estimates, row-major.
    pub fn values(&self) -> Vec<Real> {
        self.data.iter().map(Uncertain::value).collect()
    }

    /// Standard uncertainties, row-major.
    pub fn uncertainties(&self) -> Vec<Real> {
        self.data.iter().map(Uncertain::uncertainty).collect()
    }

    // ── Element-wise arithmetic ───────────────────────────────────────────────

    /// Apply `f` element-wise after broadcasting the operands.
    pub fn zip_with<F>(&self, rhs: &UncertainArray, f: F) -> Result<UncertainArray>
    where
        F: Fn(&Uncertain, &Uncertain) -> Uncertain,
    {
        let (shape, data) = if self.shape == rhs.shape {
            (
                self.shape.clone(),
                self.data.iter().zip(&rhs.data).map(|(a, b)| f(a, b)).collect(),
            )
        } else if self.is_scalar() {
            let a = &self.data[0];
            (rhs.shape.clone(), rhs.data.iter().map(|b| f(a, b)).collect())
        } else if rhs.is_scalar() {
            let b = &rhs.data[0];
            (self.shape.clone(), self.data.iter().map(|a| f(a, b)).collect())
        } else {
            return Err(Error::ShapeMismatch {
                left: self.shape.clone(),
                right: rhs.shape.clone(),
            });
        };
        Ok(UncertainArray { shape, data })
    }

    /// Element-wise `self ⊕ rhs`.
    pub fn combine(&self, op: BinaryOp, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.zip_with(rhs, |a, b| a.combine(op, b))
    }

    /// Element-wise sum.
    pub fn try_add(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.combine(BinaryOp::Add, rhs)
    }

    /// Element-wise difference.
    pub fn try_sub(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.combine(BinaryOp::Sub, rhs)
    }

    /// Element-wise product.
    pub fn try_mul(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.combine(BinaryOp::Mul, rhs)
    }

    /// Element-wise quotient.
    pub fn try_div(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.combine(BinaryOp::Div, rhs)
    }

    /// Element-wise power.
    pub fn try_pow(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        self.combine(BinaryOp::Pow, rhs)
    }

    /// Apply `f` to every element, keeping the shape.
    pub fn map<F>(&self, f: F) -> UncertainArray
    where
        F: Fn(&Uncertain) -> Uncertain,
    {
        UncertainArray {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Element-wise elementary function.
    pub fn map_function(&self, function: Function) -> UncertainArray {
        self.map(|x| x.apply(function))
    }

    // ── Reductions ────────────────────────────────────────────────────────────

    /// `(Σ values, sqrt(Σ σ²))`.
    ///
    /// Elements are treated as independent; the ledger weights each
    /// element's ledger by its share of the summed variance.
    pub fn sum(&self) -> Result<Uncertain> {
        ensure!(!self.data.is_empty(), "cannot sum an empty array");
        let value: Real = self.data.iter().map(Uncertain::value).sum();
        let variance: Real = self.data.iter().map(|x| x.uncertainty().powi(2)).sum();
        let identity = self.data[1..]
            .iter()
            .fold(self.data[0].identity(), |acc, x| {
                Identity::combine(BinaryOp::Add, acc, x.identity())
            });
        let label = format!(
            "({})",
            self.data
                .iter()
                .map(Uncertain::label)
                .collect::<Vec<_>>()
                .join("+")
        );
        let contributions = if variance == 0.0 {
            Contributions::new()
        } else {
            Contributions::merge_all(
                self.data
                    .iter()
                    .map(|x| (x.uncertainty().powi(2) / variance, x.contributions())),
            )
        };
        Ok(Uncertain::from_parts(
            value,
            variance.sqrt(),
            identity,
            label,
            contributions,
        ))
    }

    /// `(mean(values), sqrt(Σ σ²) / n)`.
    pub fn mean(&self) -> Result<Uncertain> {
        let total = self.sum()?;
        let n = self.data.len() as Real;
        Ok(Uncertain::from_parts(
            total.value() / n,
            total.uncertainty() / n,
            Identity::combine(BinaryOp::Div, total.identity(), Identity::of_constant(n)),
            BinaryOp::Div.label(total.label(), &literal_label(n)),
            total.contributions().clone(),
        ))
    }

    /// Element with the smallest value (first one on ties), unchanged.
    pub fn min(&self) -> Result<Uncertain> {
        self.extreme(|candidate, best| candidate < best)
    }

    /// Element with the largest value (first one on ties), unchanged.
    pub fn max(&self) -> Result<Uncertain> {
        self.extreme(|candidate, best| candidate > best)
    }

    fn extreme<F>(&self, better: F) -> Result<Uncertain>
    where
        F: Fn(Real, Real) -> bool,
    {
        let mut it = self.data.iter();
        let Some(mut best) = it.next() else {
            fail!("cannot take the extreme of an empty array");
        };
        for x in it {
            if better(x.value(), best.value()) {
                best = x;
            }
        }
        Ok(best.clone())
    }

    // ── Products ──────────────────────────────────────────────────────────────

    /// Inner product of two one-dimensional arrays, accumulated with the
    /// pairwise operators so every step merges provenance.
    pub fn dot(&self, rhs: &UncertainArray) -> Result<Uncertain> {
        if self.shape.len() != 1 || self.shape != rhs.shape {
            return Err(Error::ShapeMismatch {
                left: self.shape.clone(),
                right: rhs.shape.clone(),
            });
        }
        accumulate_products(self.data.iter().zip(&rhs.data))
    }

    /// Matrix product.
    ///
    /// Accepts `(m, k) × (k, n)`, `(m, k) × (k)`, `(k) × (k, n)`, and
    /// `(k) × (k)`; a one-dimensional operand is treated as a row (left)
    /// or column (right) vector and that axis is dropped from the result.
    /// Each entry is built from the pairwise `*` and `+`.
    pub fn matmul(&self, rhs: &UncertainArray) -> Result<UncertainArray> {
        let mismatch = || Error::ShapeMismatch {
            left: self.shape.clone(),
            right: rhs.shape.clone(),
        };
        let (m, k) = match self.shape.as_slice() {
            [k] => (1, *k),
            [m, k] => (*m, *k),
            _ => return Err(mismatch()),
        };
        let (k2, n) = match rhs.shape.as_slice() {
            [k] => (*k, 1),
            [k, n] => (*k, *n),
            _ => return Err(mismatch()),
        };
        if k != k2 {
            return Err(mismatch());
        }

        let mut data = Vec::with_capacity(m * n);
        for i in 0..m {
            for j in 0..n {
                let row = (0..k).map(|p| &self.data[i * k + p]);
                let col = (0..k).map(|p| &rhs.data[p * n + j]);
                data.push(accumulate_products(row.zip(col))?);
            }
        }

        let mut shape = Vec::new();
        if self.shape.len() == 2 {
            shape.push(m);
        }
        if rhs.shape.len() == 2 {
            shape.push(n);
        }
        Ok(UncertainArray { shape, data })
    }
}

fn check_lengths(values: &[Real], uncertainties: &[Real]) -> Result<()> {
    if values.len() != uncertainties.len() {
        return Err(Error::ShapeMismatch {
            left: vec![values.len()],
            right: vec![uncertainties.len()],
        });
    }
    Ok(())
}

/// Element `i` labelled `name[i]`, or by its value when unnamed.
fn element_leaf(
    name: Option<&str>,
    i: usize,
    value: Real,
    uncertainty: Real,
    identity: Identity,
) -> Uncertain {
    let (label, key) = match name {
        Some(name) => {
            let label = format!("{name}[{i}]");
            (label.clone(), label)
        }
        None => {
            let label = literal_label(value);
            let key = unnamed_key(&label, identity);
            (label, key)
        }
    };
    Uncertain::leaf_with_identity(value, uncertainty, label, key, identity)
}

/// `Σ aᵢ·bᵢ` folded left with the propagating operators.
fn accumulate_products<'a, I>(mut pairs: I) -> Result<Uncertain>
where
    I: Iterator<Item = (&'a Uncertain, &'a Uncertain)>,
{
    let Some((a, b)) = pairs.next() else {
        fail!("cannot multiply along an empty axis");
    };
    Ok(pairs.fold(a * b, |acc, (a, b)| acc + a * b))
}

// ── Conversions & display ─────────────────────────────────────────────────────

impl From<Uncertain> for UncertainArray {
    fn from(x: Uncertain) -> Self {
        UncertainArray::scalar(x)
    }
}

impl From<Vec<Uncertain>> for UncertainArray {
    fn from(data: Vec<Uncertain>) -> Self {
        UncertainArray::from_elements(data)
    }
}

impl fmt::Display for UncertainArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = Settings::instance();
        let join = |xs: Vec<Real>| {
            xs.into_iter()
                .map(|x| settings.format_real(x))
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{} ± {}", join(self.values()), join(self.uncertainties()))
    }
}

impl Magnitude for UncertainArray {
    fn from_real(x: Real) -> Self {
        UncertainArray::scalar(Uncertain::constant(x))
    }

    fn try_add(&self, rhs: &Self) -> Result<Self> {
        UncertainArray::try_add(self, rhs)
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        UncertainArray::try_sub(self, rhs)
    }

    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        UncertainArray::try_mul(self, rhs)
    }

    fn try_div(&self, rhs: &Self) -> Result<Self> {
        UncertainArray::try_div(self, rhs)
    }

    fn try_pow(&self, rhs: &Self) -> Result<Self> {
        UncertainArray::try_pow(self, rhs)
    }

    fn negate(&self) -> Self {
        self.map(|x| -x)
    }

    fn scale(&self, factor: Real) -> Self {
        self.map(|x| x.scale(factor))
    }

    fn shift(&self, offset: Real) -> Self {
        self.map(|x| x.shift(offset))
    }

    fn sqrt(&self) -> Self {
        self.map_function(Function::Sqrt)
    }

    fn exponent_value(&self) -> Result<Real> {
        match self.data.as_slice() {
            [only] if self.is_scalar() => Ok(only.value()),
            _ => Err(Error::ShapeMismatch {
                left: self.shape.clone(),
                right: Vec::new(),
            }),
        }
    }
}
