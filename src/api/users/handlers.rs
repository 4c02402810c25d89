use actix_web::{HttpResponse, get, patch, post, put, web};

use crate::{
    api::{
        context::{AuthUser, ensure_owner},
        subscriptions::{subscribe, unsubscribe},
    },
    app_state::AppState,
    errors::AppError,
    services::{
        pagination::{Page, PageQuery},
        users,
    },
};

use super::structures::{UserPatchRequest, UserRequest, UserResponse, to_responses};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users ordered by id", body = [UserResponse]),
    )
)]
#[get("")]
pub async fn get_users(
    app_state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::from(query.into_inner());
    let users = users::list_users(&app_state.db, page).await?;
    Ok(HttpResponse::Ok().json(to_responses(users)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email is already registered")
    )
)]
#[post("")]
pub async fn create_user(
    app_state: web::Data<AppState>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let new_user = body.into_inner().validate(app_state.config.today())?;
    let created = users::create_user(&app_state.db, &app_state.config, new_user).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
#[get("/{id}")]
pub async fn get_user(
    app_state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user = users::get_user(&app_state.db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User replaced", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token belongs to another user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email is already registered")
    ),
    security(("bearer_auth" = []))
)]
#[put("/{id}")]
pub async fn update_user(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UserRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    // 404 для несуществующего id, а не 403
    users::get_user(&app_state.db, id).await?;
    ensure_owner(&auth, id)?;

    let new_user = body.into_inner().validate(app_state.config.today())?;
    let updated = users::update_user(&app_state.db, &app_state.config, id, new_user).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UserPatchRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token belongs to another user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email is already registered")
    ),
    security(("bearer_auth" = []))
)]
#[patch("/{id}")]
pub async fn patch_user(
    app_state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UserPatchRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    // 404 для несуществующего id, а не 403
    users::get_user(&app_state.db, id).await?;
    ensure_owner(&auth, id)?;

    let changes = body.into_inner().validate(app_state.config.today())?;
    let updated = users::patch_user(&app_state.db, &app_state.config, id, changes).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

// Функция для регистрации всех маршрутов этого модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(get_users)
            .service(create_user)
            .service(get_user)
            .service(update_user)
            .service(patch_user)
            .service(subscribe)
            .service(unsubscribe),
    );
}
