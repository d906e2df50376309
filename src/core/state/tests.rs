//! State transition tests.

use super::session::UNTITLED_SESSION;
use super::{ChatState, Sender, SessionKind, StateError, title_preview};

fn state() -> ChatState {
    ChatState::new("ian", SessionKind::Persistent)
}

#[test]
fn new_state_has_one_session_with_one_chat() {
    let s = state();
    assert_eq!(s.sessions().len(), 1);
    assert_eq!(s.active_session().chats.len(), 1);
    assert_eq!(s.active_chat().title, "Chat 1");
    assert_eq!(s.active_session().title, UNTITLED_SESSION);
    assert_eq!(s.user_id(), "ian");
}

#[test]
fn new_chat_appends_and_activates() {
    let mut s = state();
    let first = s.active_chat().id.clone();
    let second = s.new_chat();
    assert_ne!(first, second);
    assert_eq!(s.active_chat().id, second);
    assert_eq!(s.active_chat().title, "Chat 2");
    assert_eq!(s.active_session().chats.len(), 2);
}

#[test]
fn select_chat_switches_tab() {
    let mut s = state();
    let first = s.active_chat().id.clone();
    s.new_chat();
    s.select_chat(&first).expect("known chat");
    assert_eq!(s.active_chat().id, first);
}

#[test]
fn select_unknown_chat_leaves_state_unchanged() {
    let mut s = state();
    let active = s.active_chat().id.clone();
    let err = s.select_chat("nope").unwrap_err();
    assert_eq!(err, StateError::UnknownChat("nope".to_string()));
    assert_eq!(s.active_chat().id, active);
}

#[test]
fn cycle_chat_wraps_both_ways() {
    let mut s = state();
    let first = s.active_chat().id.clone();
    let second = s.new_chat();
    s.cycle_chat(true);
    assert_eq!(s.active_chat().id, first);
    s.cycle_chat(false);
    assert_eq!(s.active_chat().id, second);
}

#[test]
fn new_session_activates_it() {
    let mut s = state();
    let old = s.active_session().id.clone();
    let id = s.new_session(SessionKind::Ephemeral);
    assert_ne!(old, id);
    assert_eq!(s.active_session().id, id);
    assert_eq!(s.active_session().kind, SessionKind::Ephemeral);
    s.select_session(&old).expect("known session");
    assert_eq!(s.active_session().id, old);
    assert!(matches!(
        s.select_session("missing"),
        Err(StateError::UnknownSession(_))
    ));
}

#[test]
fn append_message_titles_session_from_first_user_message() {
    let mut s = state();
    let chat = s.active_chat().id.clone();
    s.append_message(&chat, Sender::User, "What is\nEuler's identity?")
        .expect("append");
    s.append_message(&chat, Sender::Assistant, "$e^{i\\pi} + 1 = 0$")
        .expect("append");
    s.append_message(&chat, Sender::User, "Thanks").expect("append");
    assert_eq!(s.active_session().title, "What is Euler's identity?");
    assert_eq!(s.active_chat().messages.len(), 3);
    assert_eq!(
        s.active_chat().last_assistant_reply(),
        Some("$e^{i\\pi} + 1 = 0$")
    );
}

#[test]
fn append_message_targets_originating_chat() {
    let mut s = state();
    let origin = s.active_chat().id.clone();
    s.new_chat();
    s.append_message(&origin, Sender::Assistant, "late reply")
        .expect("append");
    assert!(s.active_chat().messages.is_empty());
    let origin_chat = &s.active_session().chats[0];
    assert_eq!(origin_chat.messages[0].content, "late reply");
}

#[test]
fn append_message_reaches_inactive_session() {
    let mut s = state();
    let origin = s.active_chat().id.clone();
    s.new_session(SessionKind::Persistent);
    s.append_message(&origin, Sender::Assistant, "reply").expect("append");
    assert_eq!(s.sessions()[0].message_count(), 1);
    assert_eq!(s.active_session().message_count(), 0);
    let owner = s.session_of_chat(&origin).expect("owner");
    assert_eq!(owner.id, s.sessions()[0].id);
    assert!(s.session_of_chat("missing").is_none());
}

#[test]
fn append_rejects_blank_and_unknown() {
    let mut s = state();
    let chat = s.active_chat().id.clone();
    assert_eq!(
        s.append_message(&chat, Sender::User, "   "),
        Err(StateError::EmptyMessage)
    );
    assert!(matches!(
        s.append_message("nope", Sender::User, "hi"),
        Err(StateError::UnknownChat(_))
    ));
    assert_eq!(s.active_session().message_count(), 0);
}

#[test]
fn request_context_omits_session_for_ephemeral() {
    let mut s = state();
    let ctx = s.request_context();
    assert_eq!(ctx.user_id, "ian");
    assert_eq!(ctx.session_id.as_deref(), Some(s.active_session().id.as_str()));
    assert_eq!(ctx.chat_id, s.active_chat().id);

    s.new_session(SessionKind::Ephemeral);
    assert_eq!(s.request_context().session_id, None);
}

#[test]
fn open_session_replaces_by_id_and_activates() {
    let mut s = state();
    let mut loaded = s.active_session().clone();
    loaded.title = "Loaded".to_string();
    s.new_session(SessionKind::Persistent);
    s.open_session(loaded.clone());
    assert_eq!(s.sessions().len(), 2);
    assert_eq!(s.active_session().title, "Loaded");
    assert_eq!(s.active_session().active_chat_index(), 0);
}

#[test]
fn open_session_without_chats_gets_one() {
    let mut s = state();
    let mut loaded = s.active_session().clone();
    loaded.id = "other".to_string();
    loaded.chats.clear();
    s.open_session(loaded);
    assert_eq!(s.active_session().id, "other");
    assert_eq!(s.active_session().chats.len(), 1);
}

#[test]
fn remove_last_session_keeps_one_of_same_kind() {
    let mut s = ChatState::new("u", SessionKind::Ephemeral);
    let id = s.active_session().id.clone();
    s.remove_session(&id).expect("remove");
    assert_eq!(s.sessions().len(), 1);
    assert_ne!(s.active_session().id, id);
    assert_eq!(s.active_session().kind, SessionKind::Ephemeral);
}

#[test]
fn remove_active_session_activates_previous() {
    let mut s = state();
    let first = s.active_session().id.clone();
    let second = s.new_session(SessionKind::Persistent);
    s.remove_session(&second).expect("remove");
    assert_eq!(s.active_session().id, first);
}

#[test]
fn title_preview_truncates_with_ellipsis() {
    let t = title_preview("This is a very long message that exceeds the max length", 20);
    assert!(t.ends_with('…'));
    assert_eq!(t.chars().count(), 20);
    assert_eq!(title_preview("  Hello\nworld  ", 50), "Hello world");
}

#[test]
fn rename_session_trims_and_rejects_blank() {
    let mut s = state();
    let id = s.active_session().id.clone();
    s.rename_session(&id, "  Linear algebra ").expect("rename");
    assert_eq!(s.active_session().title, "Linear algebra");
    assert_eq!(s.rename_session(&id, "  "), Err(StateError::EmptyTitle));
    assert_eq!(s.rename_session(&id, "\n\t"), Err(StateError::EmptyTitle));
    assert_eq!(s.active_session().title, "Linear algebra");
    assert_eq!(
        s.rename_session("missing", "x"),
        Err(StateError::UnknownSession("missing".to_string()))
    );
    assert_eq!(s.active_session().title, "Linear algebra");
}
