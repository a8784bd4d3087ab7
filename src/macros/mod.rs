/// Builds a source list (`Vec<Box<dyn Iterator<Item = T>>>`) out of a
/// comma-separated run of iterables, so sources of different iterator types
/// can feed one aggregation call.
#[macro_export]
macro_rules! sources {
    () => {
        ::std::vec::Vec::new()
    };

    ($($source:expr),+ $(,)?) => {
        vec![$($crate::aggregate::boxed($source)),+]
    };
}
