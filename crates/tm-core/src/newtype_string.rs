//! Macro for defining validated string newtypes.
//!
//! Each generated type wraps a `String` that passed a caller-supplied
//! validation function, and carries the same set of trait impls (Display,
//! Deref, AsRef, Borrow, TryFrom, PartialEq, Serialize, Deserialize).

/// Define a validated string newtype.
///
/// `validate` is a `fn(&str) -> Result<(), String>` returning the rejection
/// reason. Generates `new()` (panics on invalid input), `try_new()`,
/// `as_str()`, `into_inner()`, and a `Deserialize` impl that runs the same
/// validation.
macro_rules! define_newtype_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident;
        validate = $validate:path;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        #[serde(transparent)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::try_new(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Create a new instance, panicking if validation fails.
            ///
            /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
            pub fn new(name: impl Into<String>) -> Self {
                match Self::try_new(name) {
                    Ok(v) => v,
                    Err(reason) => panic!("{}", reason),
                }
            }

            /// Validate and wrap `name`, returning the rejection reason on failure.
            pub fn try_new(name: impl Into<String>) -> Result<Self, String> {
                let s = name.into();
                $validate(&s).map_err(|reason| {
                    format!("invalid {} '{}': {}", stringify!($Name), s, reason)
                })?;
                Ok(Self(s))
            }

            /// Return the underlying name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<&str> for $Name {
            type Error = String;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::try_new(s)
            }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_newtype_string;
