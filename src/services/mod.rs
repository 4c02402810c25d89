pub mod auth;
pub mod bootstrap;
pub mod pagination;
pub mod subscriptions;
pub mod users;
