/// System-role persona for every review request.
pub const REVIEWER_PERSONA: &str =
    "You are a senior code reviewer specializing in mobile development.";
