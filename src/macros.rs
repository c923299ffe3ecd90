#[macro_export]
macro_rules! mask {
    ($format:literal) => {{
        static MASK: once_cell::sync::Lazy<$crate::Mask> =
            once_cell::sync::Lazy::new(|| $crate::Mask::new($format).unwrap());
        &*MASK
    }};
    ($format:literal, $($notation:expr),+ $(,)?) => {{
        static MASK: once_cell::sync::Lazy<$crate::Mask> = once_cell::sync::Lazy::new(|| {
            $crate::Mask::with_notations($format, &[$($notation),+]).unwrap()
        });
        &*MASK
    }};
}
