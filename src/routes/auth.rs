use crate::{
    auth::{issue_token, IdentityService, LoginRequest, RegisterRequest, RegisterResponse},
    config::Config,
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use log::debug;
use validator::Validate;

/// Register a new user
///
/// Validates the payload against the password policy, then hands the
/// pre-validated credentials to the identity service. Only the username is
/// echoed back; the password hash never leaves the server.
#[post("/register")]
pub async fn register(
    identities: web::Data<IdentityService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    if let Err(e) = register_data.validate() {
        debug!("Registration payload failed validation: {}", e);
        return Err(e.into());
    }

    let identity = identities
        .register(
            &register_data.username,
            &register_data.password1,
            &register_data.password2,
        )
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        username: identity.username,
    }))
}

/// Login user
///
/// Authenticates form-encoded credentials and returns a signed bearer
/// token.
#[post("/login")]
pub async fn login(
    config: web::Data<Config>,
    identities: web::Data<IdentityService>,
    login_data: web::Form<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let identity = identities
        .login(&login_data.username, &login_data.password)
        .await?;

    let token = issue_token(&identity.username, &config)?;
    Ok(HttpResponse::Ok().json(token))
}
