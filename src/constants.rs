/// Maximum length of a username or hobby name (characters)
pub const MAX_NAME_LENGTH: usize = 150;

/// Default number of hobbies per page on the popularity listing
pub const DEFAULT_POPULAR_PAGE_SIZE: u32 = 15;

/// Default session lifetime (7 days)
pub const DEFAULT_SESSION_TTL_SECS: i64 = 604_800;

/// Name of the cookie carrying the signed session token
pub const SESSION_COOKIE_NAME: &str = "session";

/// Default bound of the similarity work queue
pub const DEFAULT_SIMILARITY_QUEUE_CAPACITY: usize = 1024;

/// Minimum score for a relation to be listed as "related" on a hobby page
pub const RELATED_HOBBY_MIN_SCORE: f64 = 0.5;

/// Maximum number of related hobbies shown on a hobby page
pub const RELATED_HOBBY_LIMIT: u32 = 5;

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_EMPTY_HOBBY_NAME: &str = "Hobby name must not be empty";

pub const ERR_HOBBY_NAME_TOO_LONG: &str = "Hobby name is too long (max 150 characters)";

pub const ERR_EMPTY_USERNAME: &str = "Username must not be empty";

pub const ERR_USERNAME_TOO_LONG: &str = "Username is too long (max 150 characters)";

pub const ERR_EMPTY_PASSWORD: &str = "Password must not be empty";

pub const ERR_USERNAME_TAKEN: &str = "Username already exists! Try again.";

pub const ERR_HOBBY_ALREADY_HELD: &str = "Hobby already exists for this user!";

pub const ERR_HOBBY_NOT_HELD: &str = "Hobby not found for this user";

pub const ERR_USER_NOT_FOUND: &str = "User not found";

pub const ERR_HOBBY_NOT_FOUND: &str = "Hobby not found";

pub const ERR_MEETING_NOT_FOUND: &str = "One-on-one not found";

pub const ERR_NOT_A_PARTICIPANT: &str = "Only participants can cancel a one-on-one";

pub const ERR_MEETING_IN_PAST: &str = "One-on-one must be scheduled in the future";

pub const ERR_MEETING_WITH_SELF: &str = "Cannot schedule a one-on-one with yourself";

pub const ERR_INVALID_DATETIME: &str =
    "Invalid datetime, expected ISO-8601 (e.g. 2030-01-31T18:00:00Z)";

pub const ERR_INVALID_PAGE: &str = "Page numbers start at 1";

pub const ERR_NO_COMMON_USER: &str = "No other user shares any of your hobbies";
