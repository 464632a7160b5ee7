use float_cmp::{ApproxEq, F32Margin};
use ndarray::{ArrayBase, Data, Dimension, IntoDimension};

/// Compares two `f32` "things" with approximate equality.
///
/// The things can be floats, slices, arrays and vectors of such or `ndarray` arrays. They are
/// compared leaf by leaf in logical order and must have the same shape.
///
/// ```
/// use ndarray::arr2;
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(0.15039155, 0.1503916, ulps = 3);
/// assert_approx_eq!(&[[1., 2.], [3., 4.]], arr2(&[[1., 2.], [3., 4.]]));
/// assert_approx_eq!(vec![0.5, f32::NAN], [0.5, f32::NAN]);
/// ```
///
/// The `epsilon` defaults to `0` and the `ulps` default to `2`. Two NaNs are considered equal,
/// the assertion checks for an expected outcome and not for semantical equality.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, epsilon = 0., ulps = 2)
    };
    ($left:expr, $right:expr, ulps = $ulps:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, epsilon = 0., ulps = $ulps)
    };
    ($left:expr, $right:expr, epsilon = $epsilon:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, epsilon = $epsilon, ulps = 2)
    };
    ($left:expr, $right:expr, epsilon = $epsilon:expr, ulps = $ulps:expr $(,)?) => {
        $crate::assert_leaves(&$left, &$right, $epsilon, $ulps)
    };
}

/// Things which consist of indexed `f32` leaves.
///
/// Only meant to be used by [`assert_approx_eq!`].
pub trait Leaves {
    /// Collects the leaves in logical order, each one prefixed by the index of this thing.
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>);
}

impl Leaves for f32 {
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        leaves.push((index.clone(), *self));
    }
}

impl<T> Leaves for &T
where
    T: Leaves + ?Sized,
{
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        (**self).leaves(index, leaves);
    }
}

impl<T> Leaves for [T]
where
    T: Leaves,
{
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        for (i, item) in self.iter().enumerate() {
            index.push(i);
            item.leaves(index, leaves);
            index.pop();
        }
    }
}

impl<T, const N: usize> Leaves for [T; N]
where
    T: Leaves,
{
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        self[..].leaves(index, leaves);
    }
}

impl<T> Leaves for Vec<T>
where
    T: Leaves,
{
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        self.as_slice().leaves(index, leaves);
    }
}

impl<S, D> Leaves for ArrayBase<S, D>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    fn leaves(&self, index: &mut Vec<usize>, leaves: &mut Vec<(Vec<usize>, f32)>) {
        for (position, value) in self.indexed_iter() {
            let mut index = index.clone();
            index.extend(position.into_dimension().slice());
            leaves.push((index, *value));
        }
    }
}

fn flatten(thing: &(impl Leaves + ?Sized)) -> Vec<(Vec<usize>, f32)> {
    let mut leaves = Vec::new();
    thing.leaves(&mut Vec::new(), &mut leaves);
    leaves
}

/// Asserts the approximate equality of the leaves of both things.
///
/// Only meant to be used by [`assert_approx_eq!`].
#[track_caller]
pub fn assert_leaves<L, R>(left: &L, right: &R, epsilon: f32, ulps: i32)
where
    L: Leaves + ?Sized,
    R: Leaves + ?Sized,
{
    let margin = F32Margin { epsilon, ulps };
    let left = flatten(left);
    let right = flatten(right);

    for ((left_index, left), (right_index, right)) in left.iter().zip(right.iter()) {
        assert_eq!(
            left_index, right_index,
            "mismatching shapes at index {:?} != {:?}",
            left_index, right_index,
        );
        assert!(
            (left.is_nan() && right.is_nan()) || left.approx_eq(*right, margin),
            "approximate equality failed at index {:?}: {:?} != {:?} (epsilon = {:?}, ulps = {:?})",
            left_index,
            left,
            right,
            epsilon,
            ulps,
        );
    }
    assert_eq!(left.len(), right.len(), "mismatching number of leaves");
}
