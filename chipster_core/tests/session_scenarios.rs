use std::{cell::RefCell, rc::Rc, time::Duration};

use chipster_core::{
    engine::Engine,
    error::AddError,
    key_event::{Action, InputEvent},
    model::{Candidate, Mode, UiState},
    session::Session,
    suggestion::StaticSuggestions,
    validation::{ValidationConfig, ValidationRule},
};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn session(engine: Engine<StaticSuggestions>) -> Session<StaticSuggestions> {
    Session::new(engine)
}

fn fruit() -> StaticSuggestions {
    StaticSuggestions::new([
        Candidate::plain("apple"),
        Candidate::plain("apricot"),
        Candidate::labeled("Banana", Some("🍌".into()), Some(serde_json::json!({"sku": 42}))),
    ])
}

fn type_text(session: &mut Session<StaticSuggestions>, text: &str) -> Vec<Action> {
    let mut actions = Vec::new();
    for ch in text.chars() {
        let (_, mut a) = session.handle(InputEvent::Char(ch));
        actions.append(&mut a);
    }
    actions
}

fn texts(ui: &UiState) -> Vec<&str> {
    ui.entries.iter().map(|e| e.text()).collect()
}

#[test]
fn typing_a_joiner_commits_the_text() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    let actions = type_text(&mut s, "first,");
    let ui = s.ui_state();
    assert_eq!(texts(&ui), vec!["first"]);
    assert_eq!(ui.input_text, "");
    let added: Vec<&str> = actions
        .iter()
        .filter_map(|a| match a {
            Action::Added { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(added, vec!["first"]);
    assert_eq!(actions.last(), Some(&Action::InputChanged(String::new())));
}

#[test_case(InputEvent::SetText("first,".into()); "programmatic")]
#[test_case(InputEvent::Paste("first,".into()); "paste")]
fn trailing_joiner_in_changed_text_commits(event: InputEvent) {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    let (ui, _) = s.handle(event);
    assert_eq!(texts(&ui), vec!["first"]);
    assert_eq!(ui.input_text, "");
}

#[test_case(';')]
#[test_case('|')]
fn custom_joiners_replace_comma(joiner: char) {
    let mut s = session(Engine::new(StaticSuggestions::default()).with_joiners([joiner]));
    type_text(&mut s, "a,b");
    assert!(s.entries().is_empty());
    type_text(&mut s, &joiner.to_string());
    assert_eq!(texts(&s.ui_state()), vec!["a,b"]);
}

#[test]
fn joiner_on_empty_input_is_swallowed() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    let (ui, actions) = s.handle(InputEvent::Char(','));
    assert_eq!(ui.input_text, "");
    assert!(ui.entries.is_empty());
    assert!(actions.is_empty());
}

#[test_case(InputEvent::SetText(",".into()); "bare joiner")]
#[test_case(InputEvent::SetText("  ".into()); "whitespace")]
#[test_case(InputEvent::Paste(" ,".into()); "whitespace and joiner")]
fn enter_on_blank_buffer_commits_nothing(event: InputEvent) {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    let (ui, _) = s.handle(event.clone());
    assert!(ui.error.is_none());

    let (ui, actions) = s.handle(InputEvent::Enter);
    assert!(ui.entries.is_empty());
    assert!(actions.is_empty());
}

#[test]
fn input_changes_are_reported() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&log);
    let mut s = session(Engine::new(fruit()))
        .on_input_change(move |text| sink.borrow_mut().push(text.to_owned()));

    type_text(&mut s, "ap");
    s.handle(InputEvent::Backspace);
    s.handle(InputEvent::ArrowDown);
    s.handle(InputEvent::Enter);
    s.handle(InputEvent::Char(','));
    assert_eq!(*log.borrow(), vec!["a", "ap", "a", ""]);
    assert_eq!(texts(&s.ui_state()), vec!["apple"]);

    let (_, actions) = s.handle(InputEvent::SetText("apple,".into()));
    assert_eq!(
        actions,
        vec![
            Action::Rejected("Duplicate items are not allowed".into()),
            Action::InputChanged("apple".into()),
        ]
    );
    // Enter 被拒时缓冲不变，不通知
    let (_, actions) = s.handle(InputEvent::Enter);
    assert_eq!(actions, vec![Action::Rejected("Duplicate items are not allowed".into())]);
}

#[test]
fn direct_add_refuses_blank_values() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    assert_eq!(s.add_item("   "), Err(AddError::Empty));
    assert!(s.entries().is_empty());
    assert!(s.ui_state().error.is_none());
}

#[test]
fn enter_commits_and_clears_input() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    type_text(&mut s, "  hello ");
    let (ui, _) = s.handle(InputEvent::Enter);
    assert_eq!(texts(&ui), vec!["hello"]);
    assert_eq!(ui.input_text, "");
}

#[test]
fn rejected_enter_keeps_input_and_shows_error() {
    let validation = ValidationConfig::new().rule(ValidationRule::new(|v| v.len() >= 3, "Must be at least 3 characters"));
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(validation));
    type_text(&mut s, "ab");
    assert_eq!(s.ui_state().error.as_deref(), Some("Must be at least 3 characters"));

    let (ui, actions) = s.handle(InputEvent::Enter);
    assert_eq!(ui.input_text, "ab");
    assert!(ui.entries.is_empty());
    assert_eq!(actions, vec![Action::Rejected("Must be at least 3 characters".into())]);

    let (ui, _) = s.handle(InputEvent::Char(','));
    assert_eq!(ui.input_text, "ab");
    assert!(ui.entries.is_empty());
}

#[test]
fn failed_joiner_commit_keeps_text_without_joiner() {
    let validation = ValidationConfig::new().rule(ValidationRule::new(|v| v.len() >= 3, "short"));
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(validation));
    let (ui, _) = s.handle(InputEvent::SetText("ab,".into()));
    assert_eq!(ui.input_text, "ab");
    assert_eq!(ui.error.as_deref(), Some("short"));
}

#[test]
fn live_error_clears_when_input_is_emptied() {
    let validation = ValidationConfig::new().rule(ValidationRule::new(|v| v.len() >= 3, "short"));
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(validation));
    type_text(&mut s, "a");
    assert_eq!(s.ui_state().error.as_deref(), Some("short"));
    let (ui, _) = s.handle(InputEvent::Backspace);
    assert_eq!(ui.input_text, "");
    assert_eq!(ui.error, None);
}

#[test]
fn max_items_scenario() {
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(ValidationConfig::new().max_entries(1)));
    assert!(s.add_item("a").is_ok());
    assert!(s.add_item("b").is_err());
    let ui = s.ui_state();
    assert_eq!(texts(&ui), vec!["a"]);
    assert_eq!(ui.error.as_deref(), Some("Maximum of 1 items allowed"));
}

#[test]
fn max_items_never_exceeded() {
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(ValidationConfig::new().max_entries(3)));
    for i in 0..10 {
        let _ = s.add_item(&format!("item{i}"));
        assert!(s.entries().len() <= 3);
    }
    assert_eq!(s.entries().len(), 3);
}

#[test]
fn entries_stay_pairwise_distinct() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    for raw in ["a", "A", " a ", "b", "B", "c", "a"] {
        let _ = s.add_item(raw);
    }
    assert_eq!(texts(&s.ui_state()), vec!["a", "b", "c"]);
}

#[test]
fn transform_trim_lowercase_scenario() {
    let validation = ValidationConfig::new().transform(|v| v.trim().to_lowercase());
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(validation));
    assert!(s.add_item("  Foo  ").is_ok());
    assert!(s.add_item("  Foo  ").is_err());
    assert_eq!(texts(&s.ui_state()), vec!["foo"]);
}

#[test]
fn suggestions_only_rejects_free_text() {
    let mut s = session(Engine::new(fruit()).with_mode(Mode::SuggestionsOnly));
    assert_eq!(s.add_item("free text"), Err(AddError::SuggestionRequired));
    assert!(s.entries().is_empty());

    type_text(&mut s, "apr");
    let (ui, actions) = s.handle(InputEvent::Enter);
    assert!(ui.entries.is_empty());
    assert!(actions.is_empty());
    assert_eq!(ui.input_text, "apr");

    s.handle(InputEvent::ArrowDown);
    let (ui, _) = s.handle(InputEvent::Enter);
    assert_eq!(texts(&ui), vec!["apricot"]);
}

#[test]
fn selected_suggestion_wins_over_typed_text() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "ban");
    let ui = s.ui_state();
    assert!(ui.suggestions_visible());
    assert_eq!(ui.suggestions.len(), 1);

    s.handle(InputEvent::ArrowDown);
    let (ui, _) = s.handle(InputEvent::Enter);
    assert_eq!(texts(&ui), vec!["Banana"]);
    assert_eq!(ui.entries[0].icon(), Some("🍌"));
    assert_eq!(ui.entries[0].data(), Some(&serde_json::json!({"sku": 42})));
    assert_eq!(ui.input_text, "");
    assert!(!ui.suggestions_visible());
}

#[test]
fn suggestion_navigation_clamps() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "ap");
    assert_eq!(s.ui_state().suggestions.len(), 2);
    for _ in 0..4 {
        s.handle(InputEvent::ArrowDown);
    }
    assert_eq!(s.ui_state().selected_suggestion, Some(1));
    for _ in 0..4 {
        s.handle(InputEvent::ArrowUp);
    }
    assert_eq!(s.ui_state().selected_suggestion, Some(0));
}

#[test]
fn typing_resets_suggestion_selection() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "a");
    s.handle(InputEvent::ArrowDown);
    assert_eq!(s.ui_state().selected_suggestion, Some(0));
    type_text(&mut s, "p");
    assert_eq!(s.ui_state().selected_suggestion, None);
}

#[test]
fn suggestions_exclude_existing_entries() {
    let mut s = session(Engine::new(StaticSuggestions::new(["apple", "banana"])));
    s.add_item("apple").unwrap();
    assert_eq!(s.compute_suggestions("a"), vec![Candidate::plain("banana")]);
}

#[test]
fn escape_clears_selection_and_hides() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "ap");
    s.handle(InputEvent::ArrowDown);
    let (ui, _) = s.handle(InputEvent::Escape);
    assert_eq!(ui.selected_suggestion, None);
    assert!(!ui.show_suggestions);
    assert_eq!(ui.input_text, "ap");
}

#[test]
fn escape_clears_chip_highlight() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b"]);
    s.handle(InputEvent::ArrowLeft);
    assert_eq!(s.ui_state().highlighted_index, Some(1));
    let (ui, _) = s.handle(InputEvent::Escape);
    assert_eq!(ui.highlighted_index, None);
}

#[test]
fn backspace_selects_then_deletes() {
    let removed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&removed);
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b"])
        .on_remove(move |id| sink.borrow_mut().push(id));
    let last_id = s.entries()[1].id();

    let (ui, actions) = s.handle(InputEvent::Backspace);
    assert_eq!(ui.highlighted_index, Some(1));
    assert!(actions.is_empty());

    let (ui, actions) = s.handle(InputEvent::Backspace);
    assert_eq!(texts(&ui), vec!["a"]);
    assert_eq!(ui.highlighted_index, None);
    assert_eq!(actions, vec![Action::Removed(last_id)]);
    assert_eq!(*removed.borrow(), vec![last_id]);
}

#[test]
fn backspace_on_empty_list_does_nothing() {
    let mut s = session(Engine::new(StaticSuggestions::default()));
    let (ui, actions) = s.handle(InputEvent::Backspace);
    assert_eq!(ui.highlighted_index, None);
    assert!(actions.is_empty());
}

#[test]
fn arrow_keys_walk_the_chips() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b", "c"]);
    s.handle(InputEvent::ArrowLeft);
    assert_eq!(s.ui_state().highlighted_index, Some(2));
    s.handle(InputEvent::ArrowLeft);
    s.handle(InputEvent::ArrowLeft);
    s.handle(InputEvent::ArrowLeft);
    assert_eq!(s.ui_state().highlighted_index, Some(0));

    s.handle(InputEvent::ArrowRight);
    assert_eq!(s.ui_state().highlighted_index, Some(1));
    s.handle(InputEvent::ArrowRight);
    let (ui, actions) = s.handle(InputEvent::ArrowRight);
    assert_eq!(ui.highlighted_index, None);
    assert_eq!(actions, vec![Action::FocusInput]);
}

#[test]
fn arrow_keys_ignore_chips_while_typing() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a"]);
    type_text(&mut s, "x");
    let (ui, _) = s.handle(InputEvent::ArrowLeft);
    assert_eq!(ui.highlighted_index, None);
}

#[test]
fn delete_moves_highlight_to_neighbour() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b", "c"]);
    s.highlight_item(Some(2));
    let (ui, _) = s.handle(InputEvent::Delete);
    assert_eq!(texts(&ui), vec!["a", "b"]);
    assert_eq!(ui.highlighted_index, Some(1));

    s.highlight_item(Some(0));
    let (ui, _) = s.handle(InputEvent::Delete);
    assert_eq!(texts(&ui), vec!["b"]);
    assert_eq!(ui.highlighted_index, Some(0));

    let (ui, _) = s.handle(InputEvent::Delete);
    assert!(ui.entries.is_empty());
    assert_eq!(ui.highlighted_index, None);
}

#[test]
fn highlight_resets_after_add_and_remove() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b"]);
    s.highlight_item(Some(0));
    s.add_item("c").unwrap();
    assert_eq!(s.ui_state().highlighted_index, None);

    s.highlight_item(Some(1));
    let id = s.entries()[0].id();
    s.remove_item(id);
    assert_eq!(s.ui_state().highlighted_index, None);
}

#[test]
fn remove_button_click_removes_entry() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b"]);
    let id = s.entries()[0].id();
    let (ui, actions) = s.handle(InputEvent::RemoveClicked(id));
    assert_eq!(texts(&ui), vec!["b"]);
    assert_eq!(actions, vec![Action::Removed(id)]);

    let (ui, actions) = s.handle(InputEvent::RemoveClicked(id));
    assert_eq!(texts(&ui), vec!["b"]);
    assert!(actions.is_empty());
}

#[test]
fn blur_schedules_a_cancellable_hide() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "ap");
    let (_, actions) = s.handle(InputEvent::Blur);
    let [Action::ScheduleHide { token, delay }] = actions.as_slice() else {
        panic!("expected a single ScheduleHide, got {actions:?}");
    };
    assert_eq!(*delay, Duration::from_millis(200));

    // 点击在隐藏之前到达
    let (ui, _) = s.handle(InputEvent::SuggestionClicked(1));
    assert_eq!(texts(&ui), vec!["apricot"]);
    let (ui, _) = s.handle(InputEvent::HideTimeout(*token));
    assert_eq!(texts(&ui), vec!["apricot"]);
}

#[test]
fn hide_timeout_hides_unless_refocused() {
    let mut s = session(Engine::new(fruit()));
    type_text(&mut s, "ap");

    let (_, actions) = s.handle(InputEvent::Blur);
    let Some(Action::ScheduleHide { token, .. }) = actions.first().cloned() else {
        panic!("expected ScheduleHide");
    };
    s.handle(InputEvent::Focus);
    let (ui, _) = s.handle(InputEvent::HideTimeout(token));
    assert!(ui.suggestions_visible());

    let (_, actions) = s.handle(InputEvent::Blur);
    let Some(Action::ScheduleHide { token, .. }) = actions.first().cloned() else {
        panic!("expected ScheduleHide");
    };
    let (ui, _) = s.handle(InputEvent::HideTimeout(token));
    assert!(!ui.show_suggestions);
    assert_eq!(ui.input_text, "ap");
}

#[test]
fn callbacks_receive_every_notification() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let (add_log, err_log) = (Rc::clone(&log), Rc::clone(&log));
    let mut s = session(Engine::new(StaticSuggestions::default()))
        .on_add(move |_, text| add_log.borrow_mut().push(format!("add:{text}")))
        .on_error(move |message| err_log.borrow_mut().push(format!("error:{message}")));

    type_text(&mut s, "x,x,");
    s.add_item("y").unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["add:x", "error:Duplicate items are not allowed", "add:y"]
    );
}

#[test]
fn disabled_session_ignores_input() {
    let mut s = Session::with_entries(Engine::new(StaticSuggestions::default()).with_disabled(true), ["a"]);
    type_text(&mut s, "b,");
    let (ui, actions) = s.handle(InputEvent::Backspace);
    assert!(ui.disabled);
    assert_eq!(ui.input_text, "");
    assert_eq!(texts(&ui), vec!["a"]);
    assert!(actions.is_empty());

    s.set_disabled(false);
    type_text(&mut s, "b,");
    assert_eq!(texts(&s.ui_state()), vec!["a", "b"]);
}

#[test]
fn default_value_seeds_entries_with_unique_ids() {
    let s = Session::with_entries(Engine::new(StaticSuggestions::default()), ["a", "b", "c"]);
    let ids: std::collections::HashSet<_> = s.entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn set_validation_clears_stale_error() {
    let validation = ValidationConfig::new().rule(ValidationRule::new(|v| v.len() >= 3, "short"));
    let mut s = session(Engine::new(StaticSuggestions::default()).with_validation(validation));
    type_text(&mut s, "a");
    assert!(s.ui_state().error.is_some());
    s.set_validation(ValidationConfig::new());
    assert_eq!(s.ui_state().error, None);
    s.handle(InputEvent::Enter);
    assert_eq!(texts(&s.ui_state()), vec!["a"]);
}
