use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, SqlErr,
};

use crate::{
    database::models::{user, user_subscription},
    errors::AppError,
    services::{pagination::Page, users},
};

/// Месяц и дни рождения, которые празднуются в дату `today`.
/// В невисокосный год родившиеся 29 февраля поздравляются 28-го.
pub fn birthday_match(today: NaiveDate) -> (i16, Vec<i16>) {
    let month = today.month() as i16;
    let day = today.day() as i16;

    let is_leap = NaiveDate::from_ymd_opt(today.year(), 2, 29).is_some();
    if month == 2 && day == 28 && !is_leap {
        (month, vec![28, 29])
    } else {
        (month, vec![day])
    }
}

/// Пользователи, на которых подписан `subscriber_id`.
fn subscriptions_of(subscriber_id: i32) -> Select<user::Entity> {
    user::Entity::find()
        .join(
            JoinType::InnerJoin,
            user_subscription::Relation::Subscription.def().rev(),
        )
        .filter(user_subscription::Column::UserId.eq(subscriber_id))
}

async fn find_subscription(
    db: &DatabaseConnection,
    subscriber_id: i32,
    target_id: i32,
) -> Result<Option<user_subscription::Model>, AppError> {
    let found = user_subscription::Entity::find_by_id((subscriber_id, target_id))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn subscribe(
    db: &DatabaseConnection,
    subscriber_id: i32,
    target_id: i32,
) -> Result<(), AppError> {
    if subscriber_id == target_id {
        return Err(AppError::InvalidInput("cannot subscribe to oneself".to_string()));
    }

    users::get_user(db, subscriber_id).await?;
    users::get_user(db, target_id).await?;

    let already = || {
        AppError::Conflict(format!(
            "already subscribed to user's birthday with id {}",
            target_id
        ))
    };

    if find_subscription(db, subscriber_id, target_id).await?.is_some() {
        return Err(already());
    }

    let relation = user_subscription::ActiveModel {
        user_id: Set(subscriber_id),
        subscription_id: Set(target_id),
        created_at: Set(Utc::now()),
    };

    relation.insert(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => already(),
        _ => AppError::DbError(err),
    })?;

    log::info!("User {} subscribed to user {}", subscriber_id, target_id);
    Ok(())
}

pub async fn unsubscribe(
    db: &DatabaseConnection,
    subscriber_id: i32,
    target_id: i32,
) -> Result<(), AppError> {
    if subscriber_id == target_id {
        return Err(AppError::InvalidInput("cannot unsubscribe from oneself".to_string()));
    }

    users::get_user(db, target_id).await?;

    let result = user_subscription::Entity::delete_many()
        .filter(user_subscription::Column::UserId.eq(subscriber_id))
        .filter(user_subscription::Column::SubscriptionId.eq(target_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "not subscribed to user's birthday with id {}",
            target_id
        )));
    }

    log::info!("User {} unsubscribed from user {}", subscriber_id, target_id);
    Ok(())
}

pub async fn list_subscriptions(
    db: &DatabaseConnection,
    subscriber_id: i32,
    page: Page,
) -> Result<Vec<user::Model>, AppError> {
    users::get_user(db, subscriber_id).await?;

    let users = subscriptions_of(subscriber_id)
        .order_by_asc(user::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;
    Ok(users)
}

/// Подписки пользователя, у которых день рождения приходится на `today`.
pub async fn birthdays_on(
    db: &DatabaseConnection,
    subscriber_id: i32,
    today: NaiveDate,
    page: Page,
) -> Result<Vec<user::Model>, AppError> {
    users::get_user(db, subscriber_id).await?;

    let (month, days) = birthday_match(today);
    let users = subscriptions_of(subscriber_id)
        .filter(user::Column::BirthMonth.eq(month))
        .filter(user::Column::BirthDay.is_in(days))
        .order_by_asc(user::Column::Id)
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await?;
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn regular_day_matches_itself() {
        assert_eq!(birthday_match(date(2025, 7, 14)), (7, vec![14]));
    }

    #[test]
    fn feb_28_includes_leap_day_in_common_years() {
        assert_eq!(birthday_match(date(2025, 2, 28)), (2, vec![28, 29]));
    }

    #[test]
    fn feb_28_is_plain_in_leap_years() {
        assert_eq!(birthday_match(date(2024, 2, 28)), (2, vec![28]));
        assert_eq!(birthday_match(date(2024, 2, 29)), (2, vec![29]));
    }
}
