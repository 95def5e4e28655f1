pub mod accounts;
pub mod catalog;
pub mod matching;
pub mod popularity;
pub mod scheduler;

pub use accounts::Accounts;
pub use catalog::{HobbyCatalog, HobbyDetail};
pub use matching::{CommonUser, Matcher};
pub use popularity::{PopularPage, PopularityReporter};
pub use scheduler::Scheduler;
