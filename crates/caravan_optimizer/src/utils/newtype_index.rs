/// Typed position into one of the problem catalogues. Generates the wrapper
/// plus read-only indexing into the catalogue's `Vec`/slice, which is all the
/// solver needs; catalogues are immutable after the problem is built.
#[macro_export]
macro_rules! index_newtype {
    ($name:ident, $t:ident) => {
        #[derive(
            serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        pub struct $name(usize);

        impl $name {
            pub const fn new(index: usize) -> $name {
                $name(index)
            }

            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl std::ops::Index<$name> for Vec<$t> {
            type Output = $t;

            fn index(&self, index: $name) -> &$t {
                &self.as_slice()[index]
            }
        }

        impl std::ops::Index<$name> for [$t] {
            type Output = $t;

            fn index(&self, index: $name) -> &$t {
                &self[index.0]
            }
        }
    };
}
