pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_get_birthdays, __path_get_subscriptions, __path_subscribe, __path_unsubscribe,
    get_birthdays, get_subscriptions, init_routes, subscribe, unsubscribe,
};

pub use structures::MessageResponse;
