use serde::{Deserialize, Serialize};
use vodca::AsRefln;

const MAX_SELECT_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, AsRefln, Serialize, Deserialize)]
#[serde(from = "i64")]
pub struct SelectLimit(i64);

impl SelectLimit {
    pub fn new(value: impl Into<i64>) -> Self {
        SelectLimit(value.into().clamp(1, MAX_SELECT_LIMIT))
    }
}

impl From<i64> for SelectLimit {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl Default for SelectLimit {
    fn default() -> Self {
        Self::new(30)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, AsRefln, Serialize, Deserialize)]
#[serde(from = "i64")]
pub struct SelectOffset(i64);

impl SelectOffset {
    pub fn new(value: impl Into<i64>) -> Self {
        SelectOffset(value.into().max(0))
    }
}

impl From<i64> for SelectOffset {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod test {
    use super::{SelectLimit, SelectOffset};

    #[test]
    fn limit_is_clamped() {
        assert_eq!(SelectLimit::new(0), SelectLimit::new(1));
        assert_eq!(*SelectLimit::new(10_000).as_ref(), 100);
        assert_eq!(*SelectLimit::default().as_ref(), 30);
        assert_eq!(*SelectOffset::new(-5).as_ref(), 0);
    }
}
