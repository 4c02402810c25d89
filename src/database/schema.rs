//! Создание и удаление схемы по описаниям сущностей.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema,
    sea_query::{Index, Table},
};

use super::models::{user, user_subscription};

/// Создаёт недостающие таблицы. Повторный вызов ничего не меняет.
pub async fn sync(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, user_subscription::Entity).await?;

    // Выборка именинников идёт по месяцу и дню
    let builder = db.get_database_backend();
    let index = Index::create()
        .if_not_exists()
        .name("idx_users_birth_month_day")
        .table(user::Entity)
        .col(user::Column::BirthMonth)
        .col(user::Column::BirthDay)
        .to_owned();
    db.execute(builder.build(&index)).await?;

    log::info!("Database schema is up to date");
    Ok(())
}

/// Удаляет все таблицы сервиса вместе с данными.
pub async fn drop_all(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();

    // Сначала таблица связей, она ссылается на users
    for stmt in [
        Table::drop()
            .table(user_subscription::Entity)
            .if_exists()
            .to_owned(),
        Table::drop().table(user::Entity).if_exists().to_owned(),
    ] {
        db.execute(builder.build(&stmt)).await?;
    }

    log::warn!("All service tables were dropped");
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(builder.build(&stmt)).await?;
    Ok(())
}
