// Helper functions for safe logging and serialization

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
///
/// # Example
/// ```
/// let masked = safe_token_log("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9");
/// // Returns: "eyJh...kpXVCJ9"
/// ```
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Resolve the portfolio owner whose content the public site shows.
/// By convention this is the earliest-created active account.
pub async fn portfolio_owner_id(db: &sqlx::SqlitePool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE active = 1 ORDER BY created_at, id LIMIT 1")
            .fetch_optional(db)
            .await?;
    Ok(row.map(|(id,)| id))
}

/// Serializes a JSON-encoded string column to an array for API responses
pub fn serialize_string_list<S>(list: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match list {
        Some(list_json) => {
            let items: Vec<String> = serde_json::from_str(list_json).unwrap_or_else(|_| Vec::new());
            items.serialize(serializer)
        }
        None => Vec::<String>::new().serialize(serializer),
    }
}

/// Deserializes an array into a JSON string for database storage
pub fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Vec<String> = Vec::deserialize(deserializer)?;
    let list_json = serde_json::to_string(&items).map_err(serde::de::Error::custom)?;
    Ok(Some(list_json))
}
