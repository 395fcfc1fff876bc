//! Browser DOM glue
//!
//! Every helper looks elements up by id and quietly does nothing when an
//! element is missing, so the page layout can change without breaking the
//! game.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement};

use crate::highscores::HighScores;
use crate::sim::{GameOverSummary, Hud, LevelSummary};

/// Top-level screens; exactly one is visible at a time
pub const SCREENS: [&str; 4] = ["main-menu", "game-screen", "settings-menu", "highscores-menu"];

/// Overlays drawn over the game screen
pub const OVERLAYS: [&str; 3] = ["pause-menu", "level-complete", "game-over"];

const HIDDEN_CLASS: &str = "hidden";

/// How long a toast stays on screen
const TOAST_MS: i32 = 3000;

/// Toast flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

impl MessageKind {
    fn background(&self) -> &'static str {
        match self {
            MessageKind::Info => "#58a6ff",
            MessageKind::Success => "#3fb950",
            MessageKind::Error => "#f85149",
        }
    }
}

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element(id) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1(HIDDEN_CLASS)
        } else {
            classes.remove_1(HIDDEN_CLASS)
        };
    }
}

pub fn set_class(id: &str, class: &str, on: bool) {
    if let Some(el) = element(id) {
        let _ = el.class_list().toggle_with_force(class, on);
    }
}

/// Show one screen and hide the rest
pub fn show_screen(id: &str) {
    for screen in SCREENS {
        set_hidden(screen, screen != id);
    }
}

pub fn hide_overlays() {
    for overlay in OVERLAYS {
        set_hidden(overlay, true);
    }
}

/// Attach a click handler; the closure lives for the rest of the page
pub fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
    let Some(el) = element(id) else {
        return;
    };
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Attach a change handler
pub fn on_change(id: &str, mut handler: impl FnMut() + 'static) {
    let Some(el) = element(id) else {
        return;
    };
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
    let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn checkbox(id: &str) -> Option<bool> {
    element(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.checked())
}

pub fn set_checkbox(id: &str, checked: bool) {
    if let Some(input) = element(id).and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
        input.set_checked(checked);
    }
}

pub fn input_value(id: &str) -> Option<String> {
    element(id)?
        .dyn_into::<HtmlInputElement>()
        .ok()
        .map(|input| input.value())
}

pub fn select_value(id: &str) -> Option<String> {
    element(id)?
        .dyn_into::<HtmlSelectElement>()
        .ok()
        .map(|select| select.value())
}

pub fn set_select_value(id: &str, value: &str) {
    if let Some(select) = element(id).and_then(|el| el.dyn_into::<HtmlSelectElement>().ok()) {
        select.set_value(value);
    }
}

pub fn set_button(id: &str, label: &str, disabled: bool) {
    if let Some(button) = element(id).and_then(|el| el.dyn_into::<HtmlButtonElement>().ok()) {
        button.set_text_content(Some(label));
        button.set_disabled(disabled);
    }
}

/// Run `f` once after `ms` milliseconds
pub fn after(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        ms,
    );
    closure.forget();
}

pub fn update_hud(hud: &Hud) {
    set_text("score", &hud.score.to_string());
    set_text("level", &hud.level.to_string());
    set_text("lives", &hud.lives.to_string());
    set_text("combo", &format!("x{}", hud.combo));
    set_class("combo", "combo-active", hud.combo > 1);
    set_text("powerup", hud.power_up.unwrap_or("None"));
    set_class("powerup", "powerup-active", hud.power_up.is_some());
}

pub fn show_pause(hud: &Hud, paused: bool) {
    set_hidden("pause-menu", !paused);
    if paused {
        set_text("pause-score", &hud.score.to_string());
        set_text("pause-level", &hud.level.to_string());
    }
}

pub fn show_level_complete(summary: &LevelSummary) {
    set_text("level-score", &summary.score.to_string());
    set_text("level-combo", &format!("x{}", summary.combo));
    set_text("level-time", &crate::format_time(summary.elapsed_secs));
    set_text("level-bonus", &summary.bonus.to_string());
    set_hidden("level-complete", false);
}

/// Fill and show the game-over overlay
///
/// `rank` is where the score would land on the board; without one the save
/// controls are disabled.
pub fn show_game_over(summary: &GameOverSummary, rank: Option<usize>) {
    set_text("final-score", &summary.score.to_string());
    set_text("final-level", &summary.level.to_string());
    set_text("final-time", &crate::format_time(summary.elapsed_secs));
    match rank {
        Some(rank) => {
            set_text("final-rank", &format!("New high score! Rank #{rank}"));
            set_button("save-score-btn", "Save Score", false);
        }
        None => {
            set_text("final-rank", "Not a high score this time");
            set_button("save-score-btn", "Save Score", true);
        }
    }
    set_hidden("game-over", false);
}

/// Rebuild the high score list
pub fn render_highscores(scores: &HighScores) {
    let (Some(document), Some(container)) = (document(), element("highscores-list")) else {
        return;
    };
    container.set_inner_html("");

    if scores.is_empty() {
        container.set_text_content(Some("No high scores yet. Play the game to set a record!"));
        return;
    }

    for (rank, entry) in scores.entries.iter().enumerate() {
        let Ok(row) = document.create_element("div") else {
            continue;
        };
        row.set_class_name("highscore-item");
        let cells = [
            (rank + 1).to_string(),
            entry.name.clone(),
            entry.score.to_string(),
            entry.level.to_string(),
        ];
        for text in cells {
            if let Ok(cell) = document.create_element("span") {
                // Text content, never HTML: names are user input
                cell.set_text_content(Some(&text));
                let _ = row.append_child(&cell);
            }
        }
        let _ = container.append_child(&row);
    }
}

/// Transient message in the top-right corner
pub fn show_message(text: &str, kind: MessageKind) {
    let Some(document) = document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Ok(toast) = document.create_element("div") else {
        return;
    };
    let Ok(toast) = toast.dyn_into::<HtmlElement>() else {
        return;
    };

    toast.set_text_content(Some(text));
    let style = toast.style();
    let _ = style.set_css_text(&format!(
        "position:fixed;top:20px;right:20px;background:{};color:white;\
         padding:12px 20px;border-radius:8px;font-size:14px;font-weight:500;\
         z-index:10000;box-shadow:0 4px 12px rgba(0,0,0,0.3);",
        kind.background()
    ));
    if body.append_child(&toast).is_err() {
        return;
    }

    after(TOAST_MS, move || toast.remove());
}

/// Non-recoverable startup failure: message plus a reload button
pub fn show_fatal_error(message: &str) {
    let Some(document) = document() else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };
    let Ok(overlay) = document.create_element("div") else {
        return;
    };
    overlay.set_id("fatal-error");
    let _ = overlay.set_attribute(
        "style",
        "position:fixed;inset:0;display:flex;flex-direction:column;align-items:center;\
         justify-content:center;background:rgba(13,17,23,0.95);color:#f0f6fc;z-index:10001;",
    );

    if let Ok(heading) = document.create_element("h2") {
        heading.set_text_content(Some("Failed to start the game"));
        let _ = overlay.append_child(&heading);
    }
    if let Ok(detail) = document.create_element("p") {
        detail.set_text_content(Some(message));
        let _ = overlay.append_child(&detail);
    }
    if let Ok(button) = document.create_element("button") {
        button.set_text_content(Some("Refresh"));
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        let _ = overlay.append_child(&button);
    }

    let _ = body.append_child(&overlay);
}

/// Today's date in the browser's locale
pub fn locale_date() -> String {
    js_sys::Date::new_0()
        .to_locale_date_string("default", &JsValue::UNDEFINED)
        .into()
}
