//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the careerbot-types API models.

pub struct UserRow {
    pub id: String,
    pub email: String,
    /// PHC-format Argon2 hash, never the plaintext.
    pub password: String,
    pub created_at: String,
}

pub struct ConversationRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct SummaryRow {
    pub id: String,
    pub name: String,
    pub message_count: i64,
    pub first_user_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct MessageRow {
    pub role: String,
    pub content: String,
}
