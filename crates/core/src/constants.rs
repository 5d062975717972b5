/// Default profile store table name
pub const PROFILE_TABLE: &str = "tbl_profile";

/// Default profile store column family
pub const PROFILE_FAMILY: &str = "user";

/// Default row-key prefix separating user profiles from other record kinds
/// sharing the store
pub const PROFILE_KEY_PREFIX: &str = "user:";

/// Qualifier holding the raw user id
pub const USER_ID_QUALIFIER: &str = "userId";

/// Qualifier holding the comma-joined tag id list
pub const TAG_IDS_QUALIFIER: &str = "tagIds";

/// Separator between tag ids inside the profile qualifier
pub const TAG_IDS_SEPARATOR: &str = ",";

/// Taxonomy level carrying the source/classification rule
pub const MODEL_TAG_LEVEL: i32 = 4;

/// Taxonomy level of the classification leaves
pub const LEAF_TAG_LEVEL: i32 = 5;

/// How many times the merge step re-scans and retries contended rows
/// before the run fails
pub const MAX_MERGE_ATTEMPTS: u32 = 5;
