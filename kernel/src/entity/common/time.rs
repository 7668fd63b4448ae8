use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

/// Creation time of a `T`, serialized as RFC 3339.
pub struct CreatedAt<T>(OffsetDateTime, PhantomData<T>);

impl<T> CreatedAt<T> {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into(), PhantomData)
    }

    pub fn now() -> Self {
        Self::new(OffsetDateTime::now_utc())
    }
}

impl<T> AsRef<OffsetDateTime> for CreatedAt<T> {
    fn as_ref(&self) -> &OffsetDateTime {
        &self.0
    }
}

impl<T> From<CreatedAt<T>> for OffsetDateTime {
    fn from(value: CreatedAt<T>) -> Self {
        value.0
    }
}

impl<T> Clone for CreatedAt<T> {
    fn clone(&self) -> Self {
        Self::new(self.0)
    }
}

impl<T> PartialEq for CreatedAt<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for CreatedAt<T> {}

impl<T> Hash for CreatedAt<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T> Debug for CreatedAt<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CreatedAt").field(&self.0).finish()
    }
}

impl<T> Serialize for CreatedAt<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(&self.0, serializer)
    }
}

impl<'de, T> Deserialize<'de> for CreatedAt<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        time::serde::rfc3339::deserialize(deserializer).map(Self::new)
    }
}
