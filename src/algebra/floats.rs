#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Core traits for internal floating point values.
///
/// This trait defines a subset of bounds for `FloatT`, which is preferred
/// throughout for use in the solver.
pub trait CoreFloatT:
    'static
    + Send
    + Sync
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> CoreFloatT for T where
    T: 'static
        + Send
        + Sync
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}

// serialization adds trait bounds on the float type when enabled,
// so that problem data and settings can be written to json files

cfg_if::cfg_if! {
    if #[cfg(feature="serde")] {
    /// Main trait for floating point types used in the solver.
    ///
    /// All floating point calculations are represented internally on values
    /// implementing the `FloatT` trait.  Implementations are provided for any
    /// type satisfying the bounds of `CoreFloatT`, which in practice means
    /// f32 and f64.  With the "serde" feature enabled, `FloatT` additionally
    /// requires the type to be (de)serializable.
    ///
    /// `FloatT` relies on [`num_traits`](num_traits) for most of its constituent trait bounds.
        pub trait FloatT: CoreFloatT + serde::Serialize + serde::de::DeserializeOwned {}
        impl<T> FloatT for T where T: CoreFloatT + serde::Serialize + serde::de::DeserializeOwned {}
    } else {
        pub trait FloatT: CoreFloatT {}
        impl<T> FloatT for T where T: CoreFloatT {}
    }
}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// This convenience trait is implemented on f32/64 and u32/64.  It is used
/// internally for converting constant primitives to [`FloatT`](crate::algebra::FloatT),
/// and by the [solver settings](crate::solver::QpSettings) for defaults of
/// primitive type.

// NB: `AsFloatT` lets us write (2.0).as_T() on constants
// rather than T::from_f64(2.0).unwrap() everywhere
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(u64, from_u64);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
