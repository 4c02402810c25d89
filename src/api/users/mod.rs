pub mod handlers;
pub mod structures;

pub use handlers::{
    __path_create_user, __path_get_user, __path_get_users, __path_patch_user, __path_update_user,
    create_user, get_user, get_users, init_routes, patch_user, update_user,
};

pub use structures::{UserPatchRequest, UserRequest, UserResponse};
