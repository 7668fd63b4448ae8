use std::fmt::Display;
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const PENDING: &str = "pending";
const COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Pending,
    Completed,
}

impl CartStatus {
    /// The only legal transition is `Pending -> Completed`.
    pub fn complete(&self) -> Option<Self> {
        match self {
            CartStatus::Pending => Some(CartStatus::Completed),
            CartStatus::Completed => None,
        }
    }
}

impl AsRef<str> for CartStatus {
    fn as_ref(&self) -> &str {
        match self {
            CartStatus::Pending => PENDING,
            CartStatus::Completed => COMPLETED,
        }
    }
}

impl Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl FromStr for CartStatus {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PENDING => Ok(CartStatus::Pending),
            COMPLETED => Ok(CartStatus::Completed),
            unknown => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("unknown cart status `{}`", unknown))),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::entity::CartStatus;

    #[test]
    fn parse_round() {
        assert_eq!("pending".parse::<CartStatus>().unwrap(), CartStatus::Pending);
        assert_eq!(
            "completed".parse::<CartStatus>().unwrap(),
            CartStatus::Completed
        );
        assert!("shipped".parse::<CartStatus>().is_err());
    }

    #[test]
    fn completed_is_terminal() {
        assert_eq!(CartStatus::Pending.complete(), Some(CartStatus::Completed));
        assert_eq!(CartStatus::Completed.complete(), None);
    }
}
