use chrono::{Datelike, NaiveDate};
use sea_orm::entity::prelude::*;

// --- Users ---
pub mod user {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "users")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub first_name: String,
        pub last_name: String,
        #[sea_orm(unique)]
        pub email: String,
        pub birthday: Date,
        // Денормализованные месяц и день рождения для выборки "сегодняшних" именинников
        pub birth_month: i16,
        pub birth_day: i16,
        pub password_hash: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

// --- Subscriptions (user_id следит за днём рождения subscription_id) ---
pub mod user_subscription {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_subscriptions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: i32,
        #[sea_orm(primary_key, auto_increment = false)]
        pub subscription_id: i32,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::UserId",
            to = "super::user::Column::Id",
            on_delete = "Cascade"
        )]
        Subscriber,
        #[sea_orm(
            belongs_to = "super::user::Entity",
            from = "Column::SubscriptionId",
            to = "super::user::Column::Id",
            on_delete = "Cascade"
        )]
        Subscription,
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Месяц и день рождения в виде, в котором они хранятся в `users`.
pub fn birth_parts(birthday: NaiveDate) -> (i16, i16) {
    (birthday.month() as i16, birthday.day() as i16)
}
