//! Comment author resolution.
//!
//! The API withholds comment authors unless the app has the right review
//! status, so a missing name is common. Those comments are still stored,
//! under a deterministic placeholder that a later sync can replace.

use sha2::{Digest, Sha256};

use pagedeck_types::graph::CommentPayload;

const PREFIX_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAuthor {
    pub name: String,
    pub id: String,
    pub placeholder: bool,
}

pub fn resolve_comment_author(comment: &CommentPayload) -> ResolvedAuthor {
    let id = comment.author_id().unwrap_or_default().to_string();

    match comment.author_name() {
        Some(name) => ResolvedAuthor {
            name: name.to_string(),
            id,
            placeholder: false,
        },
        None => ResolvedAuthor {
            name: placeholder_name(&comment.id, comment.author_id(), comment.text()),
            id,
            placeholder: true,
        },
    }
}

/// Synthesized display name, tried in order: the author id, a numeric id
/// found in the comment id, the message text, the comment id itself.
pub fn placeholder_name(comment_id: &str, author_id: Option<&str>, message: &str) -> String {
    if let Some(author_id) = author_id {
        return format!("User_{author_id}");
    }
    if let Some(digits) = numeric_hint(comment_id) {
        return format!("User_{digits}");
    }
    if !message.trim().is_empty() {
        let prefix: String = message
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(PREFIX_LEN)
            .collect();
        let digest = hex::encode(Sha256::digest(message.as_bytes()));
        let hash = &digest[..8];
        return if prefix.is_empty() {
            format!("Commenter_{hash}")
        } else {
            format!("Commenter_{prefix}_{hash}")
        };
    }
    format!("Commenter_{comment_id}")
}

/// Best-effort: comment ids shaped `<digits>_<10+ digits>` yield the last
/// eight digits of the second run. Other id shapes yield nothing.
fn numeric_hint(comment_id: &str) -> Option<&str> {
    let (head, tail) = comment_id.split_once('_')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(head) || !all_digits(tail) || tail.len() < 10 {
        return None;
    }
    Some(&tail[tail.len() - 8..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment(value: serde_json::Value) -> CommentPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn real_name_used_when_present() {
        let author = resolve_comment_author(&comment(json!({
            "id": "1_2",
            "message": "Nice",
            "from": { "id": "55", "name": "Ana Lima" }
        })));
        assert_eq!(
            author,
            ResolvedAuthor { name: "Ana Lima".into(), id: "55".into(), placeholder: false }
        );
    }

    #[test]
    fn message_placeholder_when_from_missing() {
        let author = resolve_comment_author(&comment(json!({
            "id": "post1_c1",
            "message": "Great post!!!"
        })));
        assert!(author.placeholder);
        assert!(author.name.starts_with("Commenter_Greatpost"));
        assert_eq!(author.id, "");
    }

    #[test]
    fn placeholder_is_deterministic() {
        let a = placeholder_name("post1_c1", None, "Great post!!!");
        let b = placeholder_name("post1_c1", None, "Great post!!!");
        assert_eq!(a, b);
        assert_ne!(a, placeholder_name("post1_c1", None, "Great post!!"));
    }

    #[test]
    fn author_id_without_name() {
        assert_eq!(placeholder_name("x_y", Some("987"), "hello"), "User_987");
    }

    #[test]
    fn numeric_id_heuristic() {
        assert_eq!(
            placeholder_name("123456_987654321012", None, "hello"),
            "User_54321012"
        );
        // Short second run: falls through to the message
        assert!(placeholder_name("123_456", None, "hello").starts_with("Commenter_hello_"));
    }

    #[test]
    fn symbols_only_and_empty_messages() {
        let symbols = placeholder_name("c7", None, "🔥🔥!!");
        assert!(symbols.starts_with("Commenter_"));
        assert_eq!(symbols.len(), "Commenter_".len() + 8);

        assert_eq!(placeholder_name("c7", None, "   "), "Commenter_c7");
    }
}
