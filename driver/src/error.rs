use error_stack::Report;
use sqlx::Error;

use kernel::KernelError;

const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";
const ADMIN_SHUTDOWN: &str = "57P01";
const CRASH_SHUTDOWN: &str = "57P02";
const CANNOT_CONNECT_NOW: &str = "57P03";
/// SQLSTATE classes: connection exception, insufficient resources.
const UNAVAILABLE_CLASSES: [&str; 2] = ["08", "53"];

pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = classify(&error);
            Report::from(error).change_context(context)
        })
    }
}

fn classify(error: &Error) -> KernelError {
    match error {
        Error::PoolTimedOut => KernelError::Timeout,
        Error::Io(_) | Error::Tls(_) | Error::PoolClosed | Error::WorkerCrashed => {
            KernelError::Unavailable
        }
        Error::Database(database) => match database.code().as_deref() {
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => KernelError::Concurrency,
            Some(UNIQUE_VIOLATION) => KernelError::Conflict("Already exists"),
            Some(ADMIN_SHUTDOWN) | Some(CRASH_SHUTDOWN) | Some(CANNOT_CONNECT_NOW) => {
                KernelError::Unavailable
            }
            Some(code) if UNAVAILABLE_CLASSES.iter().any(|class| code.starts_with(class)) => {
                KernelError::Unavailable
            }
            _ => KernelError::Internal,
        },
        _ => KernelError::Internal,
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use super::ConvertError;

    #[test]
    fn pool_timeout_is_transient() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        let report = result.convert_error().unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Timeout));
        assert!(report.current_context().is_transient());
    }

    #[test]
    fn dropped_connection_is_transient() {
        let lost = [
            sqlx::Error::Io(std::io::ErrorKind::ConnectionReset.into()),
            sqlx::Error::PoolClosed,
            sqlx::Error::WorkerCrashed,
        ];
        for error in lost {
            let result: Result<(), sqlx::Error> = Err(error);
            let report = result.convert_error().unwrap_err();
            assert!(matches!(report.current_context(), KernelError::Unavailable));
            assert!(report.current_context().is_transient());
        }
    }

    #[test]
    fn missing_row_is_internal() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        let report = result.convert_error().unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Internal));
    }
}
