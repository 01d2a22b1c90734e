mod invoice;
mod setting;
mod user;

pub use invoice::*;
pub use setting::*;
pub use user::*;
