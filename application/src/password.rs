use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use error_stack::Report;

use kernel::prelude::entity::PasswordHash;
use kernel::KernelError;

pub fn hash_password(raw: &str) -> error_stack::Result<PasswordHash, KernelError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|error| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("password hashing failed: {}", error))
        })?;
    Ok(PasswordHash::new(hash.to_string()))
}

pub fn verify_password(hash: &PasswordHash, raw: &str) -> error_stack::Result<bool, KernelError> {
    let parsed = password_hash::PasswordHash::new(hash.as_ref()).map_err(|error| {
        Report::new(KernelError::Internal)
            .attach_printable(format!("stored password hash is malformed: {}", error))
    })?;
    match Argon2::default().verify_password(raw.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(error) => Err(Report::new(KernelError::Internal)
            .attach_printable(format!("password verification failed: {}", error))),
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::PasswordHash;

    use super::{hash_password, verify_password};

    #[test]
    fn verifies_only_its_own_password() {
        let hash = hash_password("admin123").unwrap();
        assert_ne!(hash.as_ref(), "admin123");
        assert!(verify_password(&hash, "admin123").unwrap());
        assert!(!verify_password(&hash, "admin124").unwrap());
    }

    #[test]
    fn salts_differ() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hash_is_internal() {
        let report = verify_password(&PasswordHash::new("plain"), "plain").unwrap_err();
        assert!(matches!(
            report.current_context(),
            kernel::KernelError::Internal
        ));
    }
}
