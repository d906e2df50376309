//! Wire format of the chat exchange.

use serde::{Deserialize, Serialize};

use crate::core::state::RequestContext;

/// Version stamped on every request body.
pub const PAYLOAD_VERSION: u32 = 1;

/// Body of `POST /chat`. Optional fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPayload {
    pub version: u32,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub chat_id: String,
}

impl ChatPayload {
    pub fn new(context: RequestContext, prompt: impl Into<String>, provider: Option<String>) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            prompt: prompt.into(),
            provider,
            user_id: context.user_id,
            session_id: context.session_id,
            chat_id: context.chat_id,
        }
    }
}

/// Successful reply. Older backends name the text field `content`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(alias = "content")]
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(session_id: Option<&str>) -> RequestContext {
        RequestContext {
            user_id: "ian".to_string(),
            session_id: session_id.map(String::from),
            chat_id: "chat-1".to_string(),
        }
    }

    #[test]
    fn payload_omits_absent_fields() {
        let p = ChatPayload::new(context(None), "hello", None);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "version": 1,
                "prompt": "hello",
                "user_id": "ian",
                "chat_id": "chat-1",
            })
        );
    }

    #[test]
    fn payload_carries_session_and_provider() {
        let p = ChatPayload::new(context(Some("s-9")), "hi", Some("openai".to_string()));
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["session_id"], "s-9");
        assert_eq!(v["provider"], "openai");
        assert_eq!(v["version"], PAYLOAD_VERSION);
    }

    #[test]
    fn reply_accepts_response_or_content() {
        let r: ChatReply =
            serde_json::from_str(r#"{"provider":"openai","response":"(E = mc^2)"}"#).unwrap();
        assert_eq!(r.provider.as_deref(), Some("openai"));
        assert_eq!(r.response, "(E = mc^2)");

        let r: ChatReply = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(r.provider, None);
        assert_eq!(r.response, "hi");
    }

    #[test]
    fn reply_without_text_is_rejected() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"provider":"x"}"#).is_err());
    }
}
