use actix_web::{HttpResponse, get, post, web};

use crate::{
    api::{context::AuthUser, users::structures::{UserResponse, to_responses}},
    app_state::AppState,
    errors::AppError,
    services::{
        pagination::{Page, PageQuery},
        subscriptions,
    },
};

use super::structures::MessageResponse;

#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe",
    tag = "Subscriptions",
    params(
        ("id" = i32, Path, description = "ID of the user whose birthday to watch")
    ),
    responses(
        (status = 201, description = "Subscribed", body = MessageResponse),
        (status = 400, description = "Attempt to subscribe to oneself"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already subscribed")
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/subscribe")]
pub async fn subscribe(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let target_id = path.into_inner();
    subscriptions::subscribe(&app_state.db, auth.id(), target_id).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new(format!(
        "subscribed to user's birthday with id {}",
        target_id
    ))))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/unsubscribe",
    tag = "Subscriptions",
    params(
        ("id" = i32, Path, description = "ID of the watched user")
    ),
    responses(
        (status = 200, description = "Unsubscribed", body = MessageResponse),
        (status = 400, description = "Attempt to unsubscribe from oneself"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found or not subscribed")
    ),
    security(("bearer_auth" = []))
)]
#[post("/{id}/unsubscribe")]
pub async fn unsubscribe(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let target_id = path.into_inner();
    subscriptions::unsubscribe(&app_state.db, auth.id(), target_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "unsubscribed from user's birthday with id {}",
        target_id
    ))))
}

#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "Subscriptions",
    params(PageQuery),
    responses(
        (status = 200, description = "Users the caller is subscribed to", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
#[get("/subscriptions")]
pub async fn get_subscriptions(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from(query.into_inner());
    let users = subscriptions::list_subscriptions(&app_state.db, auth.id(), page).await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

#[utoipa::path(
    get,
    path = "/api/birthdays",
    tag = "Subscriptions",
    params(PageQuery),
    responses(
        (status = 200, description = "Subscriptions whose birthday is today", body = [UserResponse]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
#[get("/birthdays")]
pub async fn get_birthdays(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from(query.into_inner());
    let today = app_state.config.today();
    let users = subscriptions::birthdays_on(&app_state.db, auth.id(), today, page).await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

// `subscribe`/`unsubscribe` живут в scope `/users`, см. users::init_routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_subscriptions).service(get_birthdays);
}
