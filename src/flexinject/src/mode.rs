use std::fmt::{Display, Formatter, Result as FmtResult};

/// How a registry produces the object requested for a key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResolveMode {
    /// Invokes the factory on every request. Nothing is cached.
    New,
    /// Invokes the factory once, caches the object and hands out clones of
    /// the cached object until the key is removed.
    #[default]
    Shared,
}

impl ResolveMode {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Shared => "Shared",
        }
    }
}

impl Display for ResolveMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}
