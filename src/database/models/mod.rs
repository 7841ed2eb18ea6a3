pub mod home;
pub mod user;

pub use home::{Home, HomeSummary, Image, PropertyType};
pub use user::{User, UserProfile, UserType};
