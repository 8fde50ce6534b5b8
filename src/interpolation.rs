//! Linear interpolation against the pressure coordinate.

use itertools::{izip, Itertools};
use metfor::Quantity;
use optional::{Noned, Optioned};
use std::ops::Sub;

/// Interpolate a value from parallel vectors using the first one as the coordinate.
///
/// Assumes that `xs` is monotonic, which for this crate means pressure sorted in descending
/// order. A target outside the range of `xs` yields a missing value rather than extrapolating,
/// and a target equal to an endpoint returns the endpoint value.
#[inline]
pub fn linear_interpolate<X, Y>(xs: &[X], ys: &[Y], target_x: X) -> Optioned<Y>
where
    X: Quantity + Noned + PartialOrd + Sub<X>,
    <X as Sub<X>>::Output: Quantity,
    Y: Quantity + Noned + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_eq!(xs.len(), ys.len());

    enum BracketType<X, Y> {
        Bracket((X, Y), (X, Y)),
        EndEqual((X, Y)),
    }

    let make_bracket = |pnt_0: (X, Y), pnt_1: (X, Y)| -> Option<BracketType<X, Y>> {
        let (x0, _) = pnt_0;
        let (x1, _) = pnt_1;

        if (x0 < target_x && x1 > target_x) || (x0 > target_x && x1 < target_x) {
            Some(BracketType::Bracket(pnt_0, pnt_1))
        } else if (x0 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_0))
        } else if (x1 - target_x).unpack().abs() < std::f64::EPSILON {
            Some(BracketType::EndEqual(pnt_1))
        } else {
            None
        }
    };

    let value_opt = izip!(xs, ys)
        .map(|(x, y)| (*x, *y))
        // Look at the levels two at a time.
        .tuple_windows::<(_, _)>()
        // Map the pairs to brackets, leaving at most one bracket in the iterator.
        .filter_map(|(pnt_0, pnt_1)| make_bracket(pnt_0, pnt_1))
        .nth(0)
        .map(|bracket| match bracket {
            BracketType::Bracket((x0, y0), (x1, y1)) => linear_interp(target_x, x0, x1, y0, y1),
            BracketType::EndEqual(pnt) => pnt.1,
        });

    Optioned::from(value_opt)
}

#[inline]
fn linear_interp<X, Y>(x_val: X, x1: X, x2: X, y1: Y, y2: Y) -> Y
where
    X: Sub<X> + Copy + std::fmt::Debug + std::cmp::PartialEq,
    <X as Sub<X>>::Output: Quantity,
    Y: Quantity + Sub<Y>,
    <Y as Sub<Y>>::Output: Quantity,
{
    debug_assert_ne!(x1, x2);

    let run = (x2 - x1).unpack();
    let rise = (y2 - y1).unpack();
    let dx = (x_val - x1).unpack();

    Y::pack(y1.unpack() + dx * (rise / run))
}
