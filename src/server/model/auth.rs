use crate::{model::auth::AuthResponseDto, server::model::user::User};

/// Outcome of a successful login, registration or password reset.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub user: User,
}

impl Authenticated {
    pub fn into_dto(self) -> AuthResponseDto {
        AuthResponseDto {
            token: self.token,
            user: self.user.into_dto(),
        }
    }
}

/// Parameters for self-registration. Registered accounts always get the `user` role.
#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}
