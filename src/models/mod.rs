pub mod appointment;
pub mod availability;
pub mod enums;
pub mod user;

pub use appointment::*;
pub use availability::*;
pub use enums::*;
pub use user::*;
