use std::any::TypeId;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::di::Injectable;

/// Opaque reference to an injectable type.
///
/// A `Depends` value stands in for "resolve this type from the container at
/// request time". It is what the signature rewriter installs as the default
/// of an endpoint's receiver parameter, and what
/// [`RouterParams::dependencies`](crate::router::RouterParams) carries at the
/// router level. It is metadata only; resolution itself happens inside the
/// [`Inject`](crate::di::Inject) extractor.
#[derive(Clone, Copy)]
pub struct Depends {
    target: &'static str,
    type_id: TypeId,
}

impl Depends {
    pub fn on<T: Injectable>() -> Self {
        Self {
            target: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Full path of the referenced type.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Whether this reference points at `T`.
    pub fn resolves<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for Depends {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Depends {}

impl fmt::Debug for Depends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Depends({})", self.target)
    }
}

impl Serialize for Depends {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.target)
    }
}
