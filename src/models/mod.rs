pub mod hobby;
pub mod meeting;
pub mod user;

pub use hobby::{Hobby, HobbyRelation, Membership, RelatedHobby};
pub use meeting::{OneOnOne, OneOnOneView, PartnerMeetingRow};
pub use user::{SharedHobbyCount, User, UserRecord};
