use std::{borrow::Cow, fmt};

// Cached keys are opaque names, the protocol only ever compares and hashes
// them. Each kind gets its own type so they can't be mixed up between
// cachers.
macro_rules! cacher_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            pub fn name(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&'static str> for $name {
            fn from(name: &'static str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self::new(name)
            }
        }
    };
}

cacher_key!(
    /// Which factory or pool constructs a replica (i.e. "which archetype library")
    CreateContext
);

cacher_key!(
    /// What kind of object a replica is
    ReplicaType
);

cacher_key!(
    /// The category used to match an incoming replica against an object that
    /// already exists locally
    EmplaceContext
);
