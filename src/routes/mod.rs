mod authentications;
mod health_check;

pub use authentications::{delete_authentication, post_authentication, put_authentication};
pub use health_check::health_check;
