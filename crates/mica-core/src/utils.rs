// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Small shared utilities.

/// Declares a transparent bit-flag struct over an unsigned integer type.
///
/// Generates associated constants for each flag plus the usual set
/// operations (`contains`, `union`, `|`, `|=`). Used instead of an external
/// bitflags dependency because the handful of flag sets in this workspace
/// need nothing more.
#[macro_export]
macro_rules! mica_bitflags {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $ty:ty {
            $(
                $(#[$flag_meta:meta])*
                const $flag:ident = $value:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name {
            bits: $ty,
        }

        impl $name {
            $(
                $(#[$flag_meta])*
                pub const $flag: Self = Self { bits: $value };
            )*

            /// The empty set of flags.
            pub const fn empty() -> Self {
                Self { bits: 0 }
            }

            /// Creates a flag set from raw bits.
            pub const fn from_bits(bits: $ty) -> Self {
                Self { bits }
            }

            /// Returns the raw bits.
            pub const fn bits(&self) -> $ty {
                self.bits
            }

            /// Checks whether every flag in `other` is also set in `self`.
            pub const fn contains(&self, other: Self) -> bool {
                (self.bits & other.bits) == other.bits
            }

            /// Combines two sets of flags.
            pub const fn union(self, other: Self) -> Self {
                Self {
                    bits: self.bits | other.bits,
                }
            }

            /// Checks whether no flag is set.
            pub const fn is_empty(&self) -> bool {
                self.bits == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                self.union(rhs)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                *self = self.union(rhs);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    mica_bitflags! {
        /// Flags used only by this test.
        pub struct TestFlags: u32 {
            /// First flag.
            const A = 1 << 0;
            /// Second flag.
            const B = 1 << 1;
        }
    }

    #[test]
    fn union_and_contains() {
        let both = TestFlags::A | TestFlags::B;
        assert!(both.contains(TestFlags::A));
        assert!(both.contains(TestFlags::B));
        assert!(!TestFlags::A.contains(both));
        assert_eq!(both.bits(), 0b11);
    }

    #[test]
    fn empty_contains_nothing_but_empty() {
        let empty = TestFlags::empty();
        assert!(empty.is_empty());
        assert!(empty.contains(TestFlags::empty()));
        assert!(!empty.contains(TestFlags::A));
    }
}
