pub mod room;
pub mod user;

pub use room::Room;
pub use user::User;
