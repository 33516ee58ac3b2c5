//! Domain (namespace) normalization

use std::fmt;

/// Storage key used for the absent domain
pub const DEFAULT_RECORD_KEY: &str = "__PERSISTANCE__";

/// An optional namespace, normalized to a string on entry
///
/// Numbers are stringified immediately, so `Domain::from(0)` is the real
/// domain `"0"`. An empty string is the absent domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Domain(Option<String>);

impl Domain {
    /// The absent domain, stored under [`DEFAULT_RECORD_KEY`]
    pub const NONE: Domain = Domain(None);

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self::NONE
        } else {
            Self(Some(name))
        }
    }

    /// The domain's string form, `None` for the absent domain
    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Storage key holding this domain's record
    pub fn record_key(&self) -> &str {
        self.0.as_deref().unwrap_or(DEFAULT_RECORD_KEY)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record_key())
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Domain {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Domain {
    fn from(name: &String) -> Self {
        Self::new(name.as_str())
    }
}

impl From<&Domain> for Domain {
    fn from(domain: &Domain) -> Self {
        domain.clone()
    }
}

impl<T: Into<Domain>> From<Option<T>> for Domain {
    fn from(name: Option<T>) -> Self {
        name.map(Into::into).unwrap_or_default()
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Domain {
                fn from(n: $ty) -> Self {
                    Self::new(n.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
