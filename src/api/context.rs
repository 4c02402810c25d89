use std::{future::Future, pin::Pin};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};

use crate::{
    api::middleware::request_id,
    app_state::AppState,
    database::models::user,
    errors::AppError,
    services::{
        auth::{self, Claims},
        users,
    },
};

/// Аутентифицированный пользователь, полученный из `Authorization: Bearer <jwt>`.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub claims: Claims,
    pub user: user::Model,
}

impl AuthUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn is_same_user(&self, other: i32) -> bool {
        self.user.id == other
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let missing = || AppError::Unauthorized("missing auth token".to_string());

    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(missing)?
        .trim();

    let (scheme, token) = value.split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(missing());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token.to_string())
}

pub async fn resolve_auth_user(
    req: &HttpRequest,
    app_state: &web::Data<AppState>,
) -> Result<AuthUser, AppError> {
    let token = bearer_token(req)?;
    let claims = auth::verify_access_token(&token, &app_state.config)?;

    // Токен мог пережить пользователя
    let user = users::get_user(&app_state.db, claims.sub)
        .await
        .map_err(|err| match err {
            AppError::NotFound(_) => {
                AppError::Unauthorized("token subject no longer exists".to_string())
            }
            other => other,
        })?;

    Ok(AuthUser { claims, user })
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let app_state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    log::error!("AppState is not registered");
                    AppError::Internal
                })?;
            resolve_auth_user(&req, &app_state).await.inspect_err(|err| {
                log::info!("request_id={} authentication failed: {}", request_id(&req), err);
            })
        })
    }
}

/// Изменять ресурс пользователя может только он сам.
pub fn ensure_owner(auth: &AuthUser, owner_id: i32) -> Result<(), AppError> {
    if auth.is_same_user(owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "you can only modify your own profile".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn bearer_token_is_extracted() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "bearer abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc");
    }

    #[test]
    fn missing_or_foreign_schemes_are_rejected() {
        for value in ["", "Bearer", "Bearer   ", "Basic dXNlcjpwYXNz", "abc.def.ghi"] {
            let req = TestRequest::default()
                .insert_header((header::AUTHORIZATION, value))
                .to_http_request();
            assert!(
                matches!(bearer_token(&req), Err(AppError::Unauthorized(_))),
                "{value:?} should be rejected"
            );
        }

        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(AppError::Unauthorized(_))));
    }
}
