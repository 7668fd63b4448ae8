use time::{Duration, OffsetDateTime};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln)]
pub struct ExpiresAt(OffsetDateTime);

impl ExpiresAt {
    pub fn new(time: impl Into<OffsetDateTime>) -> Self {
        Self(time.into())
    }

    pub fn after(lifetime: Duration) -> Self {
        Self(OffsetDateTime::now_utc() + lifetime)
    }

    pub fn is_before(&self, now: OffsetDateTime) -> bool {
        self.0 <= now
    }
}
