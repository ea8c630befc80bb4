//! Opaque node ids.
//!
//! Every node category has its own id space; 0 is reserved as "none" so a
//! zero-valued id can stand in for an absent child without `Option`
//! indirection in the node payloads.

use serde::{Deserialize, Serialize};

macro_rules! node_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            /// The absent node.
            pub const NONE: $name = $name(0);

            #[inline]
            #[must_use]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }

            #[inline]
            #[must_use]
            pub const fn is_some(self) -> bool {
                self.0 != 0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

node_id!(
    /// Id of a top-level item (binding, fn, type, contract, tag, import, extern).
    ItemId
);
node_id!(
    /// Id of a statement.
    StmtId
);
node_id!(
    /// Id of an expression.
    ExprId
);
node_id!(
    /// Id of a type annotation node.
    TypeId
);
node_id!(
    /// Id of a function member inside an `extern<T>` block.
    ExternMemberId
);
