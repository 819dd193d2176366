use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque},
    rc::Rc,
    sync::Arc,
};

use serde_json::{Map, Value};

use crate::{Empty, J};

/// Detects the zero value of a type.
///
/// Fields marshalled under their default name are omitted while they hold a zero value.
/// `#[derive(Marshal)]` implements it for structs: a struct is zero when all of its
/// serialized fields are.
pub trait Zero {
    fn is_zero(&self) -> bool;
}

macro_rules! impl_numeric {
    ($($ty:ty),*) => {
        $(
            impl Zero for $ty {
                #[inline]
                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Zero for f32 {
    #[inline]
    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Zero for f64 {
    #[inline]
    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl Zero for bool {
    #[inline]
    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Zero for char {
    #[inline]
    fn is_zero(&self) -> bool {
        *self == '\0'
    }
}

impl Zero for () {
    #[inline]
    fn is_zero(&self) -> bool {
        true
    }
}

impl Zero for str {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Zero for String {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Zero for [T] {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Zero for Vec<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Zero for VecDeque<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Zero for Option<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<K, V, S> Zero for HashMap<K, V, S> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V> Zero for BTreeMap<K, V> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T, S> Zero for HashSet<T, S> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Zero for BTreeSet<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Zero + ?Sized> Zero for &T {
    #[inline]
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: Zero + ?Sized> Zero for Box<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: Zero + ?Sized> Zero for Rc<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: Zero + ?Sized> Zero for Arc<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T> Zero for Cow<'_, T>
where
    T: Zero + ToOwned + ?Sized,
{
    #[inline]
    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl Zero for Value {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl Zero for Map<String, Value> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Zero for J {
    #[inline]
    fn is_zero(&self) -> bool {
        self.is_nil()
    }
}

impl Zero for Empty {
    #[inline]
    fn is_zero(&self) -> bool {
        true
    }
}
