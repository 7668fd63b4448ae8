use error_stack::Report;
use serde::Deserialize;

use application::transfer::{LoginDto, LogoutDto, RegisterDto};
use kernel::prelude::entity::SessionToken;
use kernel::KernelError;

use crate::controller::{Intake, TryIntake};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug)]
pub struct LogoutRequest {
    token: SessionToken,
}

impl LogoutRequest {
    pub fn new(token: SessionToken) -> Self {
        Self { token }
    }
}

pub struct Transformer;

impl Intake<RegisterRequest> for Transformer {
    type To = RegisterDto;
    fn emit(&self, input: RegisterRequest) -> Self::To {
        RegisterDto {
            name: input.username,
            password: input.password,
        }
    }
}

impl TryIntake<LoginRequest> for Transformer {
    type To = LoginDto;
    type Error = Report<KernelError>;
    fn emit(&self, input: LoginRequest) -> Result<Self::To, Self::Error> {
        if input.username.is_empty() || input.password.is_empty() {
            return Err(Report::new(KernelError::Validation(
                "Username and password are required".to_string(),
            )));
        }
        Ok(LoginDto {
            name: input.username,
            password: input.password,
        })
    }
}

impl Intake<LogoutRequest> for Transformer {
    type To = LogoutDto;
    fn emit(&self, input: LogoutRequest) -> Self::To {
        LogoutDto { token: input.token }
    }
}

#[cfg(test)]
mod test {
    use kernel::KernelError;

    use super::{LoginRequest, Transformer};
    use crate::controller::TryIntake;

    #[test]
    fn login_needs_both_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"username":"admin"}"#).unwrap();
        let report = Transformer.emit(req).unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::Validation(_)
        ));

        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"admin","password":"secret"}"#).unwrap();
        let dto = Transformer.emit(req).unwrap();
        assert_eq!(dto.name, "admin");
    }
}
