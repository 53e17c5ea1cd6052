use tracing::debug;

use crate::Error;

/// An axis-aligned box `{ z : lowerbound ≤ z ≤ upperbound }` in ℝᵏ.
///
/// Infinite bounds express one-sided or free coordinates. The invariant
/// `lowerbound[i] ≤ upperbound[i]` is checked on construction and on every
/// mutation, so a `Bounds` is never empty.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBounds"))]
pub struct Bounds {
    lowerbound: Vec<f64>,
    upperbound: Vec<f64>,
}

impl Bounds {
    /// Creates a box from paired bound vectors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the vectors differ in length,
    /// if any bound is NaN, or if a lower bound exceeds its upper bound.
    pub fn new(lowerbound: Vec<f64>, upperbound: Vec<f64>) -> Result<Self, Error> {
        if lowerbound.len() != upperbound.len() {
            return Err(Error::invalid_argument(format!(
                "lower bound has length {} but upper bound has length {}",
                lowerbound.len(),
                upperbound.len()
            )));
        }
        for (i, (&lb, &ub)) in lowerbound.iter().zip(&upperbound).enumerate() {
            check_interval(i, lb, ub)?;
        }
        Ok(Self {
            lowerbound,
            upperbound,
        })
    }

    /// Creates the box ℝᵏ, unbounded in every coordinate.
    #[must_use]
    pub fn unbounded(k: usize) -> Self {
        Self {
            lowerbound: vec![f64::NEG_INFINITY; k],
            upperbound: vec![f64::INFINITY; k],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lowerbound.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lowerbound.is_empty()
    }

    #[must_use]
    pub fn lowerbound(&self) -> &[f64] {
        &self.lowerbound
    }

    #[must_use]
    pub fn upperbound(&self) -> &[f64] {
        &self.upperbound
    }

    /// Replaces the bounds of coordinate `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `i` is out of range or the
    /// interval is invalid.
    pub fn set(&mut self, i: usize, lb: f64, ub: f64) -> Result<(), Error> {
        if i >= self.len() {
            return Err(Error::invalid_argument(format!(
                "index {i} out of range for box of size {}",
                self.len()
            )));
        }
        check_interval(i, lb, ub)?;
        self.lowerbound[i] = lb;
        self.upperbound[i] = ub;
        Ok(())
    }

    /// Changes the dimension of the box.
    ///
    /// Existing coordinates keep their bounds, new coordinates are unbounded.
    pub fn resize(&mut self, k: usize) {
        debug!(from = self.len(), to = k, "resizing box");
        self.lowerbound.resize(k, f64::NEG_INFINITY);
        self.upperbound.resize(k, f64::INFINITY);
    }

    /// Returns true if every coordinate of `z` lies within the box.
    #[must_use]
    pub fn contains(&self, z: &[f64]) -> bool {
        z.len() == self.len()
            && z.iter()
                .zip(self.lowerbound.iter().zip(&self.upperbound))
                .all(|(&zi, (&lb, &ub))| lb <= zi && zi <= ub)
    }

    /// Euclidean projection onto the box, written to `out`.
    pub fn project(&self, z: &[f64], out: &mut [f64]) {
        debug_assert_eq!(z.len(), self.len());
        debug_assert_eq!(out.len(), self.len());
        for (i, (o, &zi)) in out.iter_mut().zip(z).enumerate() {
            *o = clamp(zi, self.lowerbound[i], self.upperbound[i]);
        }
    }

    /// Overwrites `z` with `z − Π(z)`, its offset from the projection.
    pub fn projecting_difference(&self, z: &mut [f64]) {
        debug_assert_eq!(z.len(), self.len());
        for (i, zi) in z.iter_mut().enumerate() {
            *zi -= clamp(*zi, self.lowerbound[i], self.upperbound[i]);
        }
    }
}

/// Clamps without panicking on NaN input, which passes through unchanged.
#[inline]
pub(crate) fn clamp(z: f64, lb: f64, ub: f64) -> f64 {
    if z.is_nan() { z } else { z.max(lb).min(ub) }
}

fn check_interval(i: usize, lb: f64, ub: f64) -> Result<(), Error> {
    if lb.is_nan() || ub.is_nan() {
        return Err(Error::invalid_argument(format!("bound {i} is NaN")));
    }
    if lb > ub {
        return Err(Error::invalid_argument(format!(
            "lower bound {lb} exceeds upper bound {ub} at index {i}"
        )));
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBounds {
    lowerbound: Vec<f64>,
    upperbound: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBounds> for Bounds {
    type Error = Error;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.lowerbound, raw.upperbound)
    }
}
