use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};
use uuid::Uuid;

use careerbot_types::models::{Conversation, ConversationSummary, Message, Role};

use crate::models::{ConversationRow, MessageRow, SummaryRow, UserRow};
use crate::{Database, StoreError, StoreResult};

/// Characters of the first user message exposed in listings.
const PREVIEW_CHARS: usize = 80;

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, email: &str, password_hash: &str) -> StoreResult<()> {
        self.with_conn_mut(|tx| {
            let inserted = tx.execute(
                "INSERT INTO users (id, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, email, password_hash, format_ts(Utc::now())],
            );
            match inserted {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Err(StoreError::DuplicateEmail)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Conversations --

    /// Summaries of every conversation owned by `owner`, most recently
    /// updated first.
    pub fn list_conversations(&self, owner: Uuid) -> StoreResult<Vec<ConversationSummary>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, c.created_at, c.updated_at,
                        (SELECT COUNT(*) FROM conversation_messages m
                          WHERE m.conversation_id = c.id),
                        (SELECT m.content FROM conversation_messages m
                          WHERE m.conversation_id = c.id AND m.role = 'user'
                          ORDER BY m.seq LIMIT 1)
                 FROM conversations c
                 WHERE c.owner_id = ?1
                 ORDER BY c.updated_at DESC, c.created_at DESC",
            )?;

            let rows = stmt
                .query_map([owner.to_string()], |row| {
                    Ok(SummaryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                        message_count: row.get(4)?,
                        first_user_message: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })?;

        rows.into_iter()
            .map(|row| -> StoreResult<ConversationSummary> {
                Ok(ConversationSummary {
                    id: parse_id(&row.id)?,
                    name: row.name,
                    message_count: row.message_count.max(0) as usize,
                    preview: row
                        .first_user_message
                        .map(|text| text.chars().take(PREVIEW_CHARS).collect()),
                    created_at: parse_ts(&row.created_at)?,
                    updated_at: parse_ts(&row.updated_at)?,
                })
            })
            .collect()
    }

    /// Create an empty, unnamed conversation.
    pub fn create_conversation(&self, owner: Uuid) -> StoreResult<Conversation> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let ts = format_ts(now);

        self.with_conn_mut(|tx| {
            tx.execute(
                "INSERT INTO conversations (id, owner_id, name, created_at, updated_at)
                 VALUES (?1, ?2, '', ?3, ?3)",
                params![id.to_string(), owner.to_string(), ts],
            )?;
            query_owned(tx, &id.to_string(), &owner.to_string())?
                .ok_or_else(|| StoreError::Corrupt(format!("conversation {} vanished after insert", id)))
        })
    }

    pub fn get_conversation(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Conversation>> {
        self.with_conn(|conn| query_owned(conn, &id.to_string(), &owner.to_string()))
    }

    /// Append one message and bump `updated_at` in a single transaction.
    /// Returns `None` when no conversation with this id belongs to `owner`.
    pub fn append_message(
        &self,
        id: Uuid,
        owner: Uuid,
        role: Role,
        content: &str,
    ) -> StoreResult<Option<Conversation>> {
        if content.trim().is_empty() {
            return Err(StoreError::InvalidInput("content must not be empty".into()));
        }

        let id = id.to_string();
        let owner = owner.to_string();
        self.with_conn_mut(|tx| {
            if !touch_owned(tx, &id, &owner)? {
                return Ok(None);
            }
            tx.execute(
                "INSERT INTO conversation_messages (conversation_id, seq, role, content)
                 SELECT ?1, COALESCE(MAX(seq) + 1, 0), ?2, ?3
                 FROM conversation_messages WHERE conversation_id = ?1",
                params![id, role.as_str(), content],
            )?;
            query_owned(tx, &id, &owner)
        })
    }

    /// Set the display name. An empty string clears it.
    pub fn rename_conversation(
        &self,
        id: Uuid,
        owner: Uuid,
        name: &str,
    ) -> StoreResult<Option<Conversation>> {
        let id = id.to_string();
        let owner = owner.to_string();
        self.with_conn_mut(|tx| {
            if !touch_owned(tx, &id, &owner)? {
                return Ok(None);
            }
            tx.execute(
                "UPDATE conversations SET name = ?1 WHERE id = ?2 AND owner_id = ?3",
                params![name, id, owner],
            )?;
            query_owned(tx, &id, &owner)
        })
    }

    /// Returns `false` when nothing owned by `owner` matched.
    pub fn delete_conversation(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        self.with_conn_mut(|tx| {
            let deleted = tx.execute(
                "DELETE FROM conversations WHERE id = ?1 AND owner_id = ?2",
                params![id.to_string(), owner.to_string()],
            )?;
            Ok(deleted > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> StoreResult<Option<UserRow>> {
    let sql = format!(
        "SELECT id, email, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                created_at: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// The single ownership guard: a conversation is only ever looked up by
/// id and owner together, so "missing" and "not yours" look the same.
fn query_owned(conn: &Connection, id: &str, owner: &str) -> StoreResult<Option<Conversation>> {
    let row = conn
        .query_row(
            "SELECT id, owner_id, name, created_at, updated_at
             FROM conversations WHERE id = ?1 AND owner_id = ?2",
            params![id, owner],
            |row| {
                Ok(ConversationRow {
                    id: row.get(0)?,
                    owner_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        )
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT role, content FROM conversation_messages
         WHERE conversation_id = ?1 ORDER BY seq",
    )?;
    let messages = stmt
        .query_map([&row.id], |r| {
            Ok(MessageRow {
                role: r.get(0)?,
                content: r.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    to_conversation(row, messages).map(Some)
}

/// Refresh `updated_at` of an owned conversation, never moving it
/// backwards. Returns `false` when the guard matched nothing.
fn touch_owned(conn: &Connection, id: &str, owner: &str) -> StoreResult<bool> {
    let previous: Option<String> = conn
        .query_row(
            "SELECT updated_at FROM conversations WHERE id = ?1 AND owner_id = ?2",
            params![id, owner],
            |r| r.get(0),
        )
        .optional()?;

    let Some(previous) = previous else {
        return Ok(false);
    };

    let next = Utc::now().max(parse_ts(&previous)?);
    conn.execute(
        "UPDATE conversations SET updated_at = ?1 WHERE id = ?2",
        params![format_ts(next), id],
    )?;
    Ok(true)
}

fn to_conversation(row: ConversationRow, messages: Vec<MessageRow>) -> StoreResult<Conversation> {
    let messages = messages
        .into_iter()
        .map(|m| -> StoreResult<Message> {
            let role = m
                .role
                .parse::<Role>()
                .map_err(|e| StoreError::Corrupt(format!("conversation {}: {}", row.id, e)))?;
            Ok(Message {
                role,
                content: m.content,
            })
        })
        .collect::<StoreResult<Vec<_>>>()?;

    Ok(Conversation {
        id: parse_id(&row.id)?,
        user_id: parse_id(&row.owner_id)?,
        name: row.name,
        messages,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
    })
}

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("timestamp '{}': {}", raw, e)))
}

fn parse_id(raw: &str) -> StoreResult<Uuid> {
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("id '{}': {}", raw, e)))
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> StoreResult<Option<T>>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> StoreResult<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
