//! Screen builders for every menu the bot shows.

use crate::action::Action;
use crate::screen::{Button, Keyboard, Screen};
use numsift_core::document::ExportFormat;
use numsift_core::gate::RequiredChannel;
use numsift_core::session::{Session, SessionSettings};
use numsift_core::transform::TransformKind;
use numsift_core::view::{ListSummary, PageView};

pub const EXPIRED_TEXT: &str = "⚠️ *Session expired.* Use /start";
pub const NO_NUMBERS_YET_TEXT: &str = "⚠️ *No numbers yet.*";
pub const NO_NUMBERS_FOUND_TEXT: &str = "⚠️ *No numbers found.*";
pub const NO_NUMBERS_IN_FILE_TEXT: &str = "⚠️ *No numbers in file.*";
pub const INVALID_NUMBER_TEXT: &str = "⚠️ *Please send a positive integer.*";
pub const UNSUPPORTED_FILE_TEXT: &str = "⚠️ *Unsupported file type.*";
pub const SESSION_ENDED_TEXT: &str = "👋 *Session ended.* Use /start to begin again.";
pub const INTERNAL_ERROR_TEXT: &str = "⚠️ *Something went wrong.* Please try again.";

/// Join prompt listing the channels at `missing` (indices into `channels`).
pub fn join_menu(channels: &[RequiredChannel], missing: &[usize]) -> Screen {
    let mut lines = Vec::new();
    let mut keyboard = Keyboard::default();
    for channel in missing.iter().filter_map(|&i| channels.get(i)) {
        lines.push(format!("❌ {}", channel.name));
        keyboard = keyboard.row(vec![Button::url(
            format!("Join {}", channel.name),
            channel.invite.clone(),
        )]);
    }
    let text = format!(
        "🔒 *Access Restricted*\n\nPlease join these channels:\n{}\n\n_When done, tap_ ✅ *I’ve Joined – Check*",
        lines.join("\n")
    );
    keyboard = keyboard.row(vec![Button::callback("✅ I’ve Joined – Check", Action::CheckJoins)]);
    Screen::with_keyboard(text, keyboard)
}

/// Main menu for the session's active generation.
///
/// With no committed numbers this is the welcome prompt, without buttons.
pub fn main_menu(session: &Session) -> Screen {
    let tokens = session.active_tokens();
    if tokens.is_empty() {
        return Screen::text(
            "> 📥 *Welcome!*\n\nSend phone numbers as text or upload a file (txt/csv/xlsx).",
        );
    }
    let summary = ListSummary::of(tokens);
    let header = format!(
        "🧮 Total: {}   |   ✅ With +: {}   |   ❌ Without +: {}",
        summary.total, summary.with_plus, summary.without_plus
    );
    Screen::with_keyboard(header, main_keyboard(session))
}

fn main_keyboard(session: &Session) -> Keyboard {
    let transform_label = if session.history.current_kind() == TransformKind::AddPlus {
        "➖ Remove +"
    } else {
        "➕ Add +"
    };
    Keyboard::default()
        .row(vec![
            Button::callback("📤 Export", Action::Export),
            Button::callback(transform_label, Action::Transform),
        ])
        .row(vec![
            Button::callback(
                "📄 Show num",
                Action::View {
                    offset: 0,
                    show_all: false,
                },
            ),
            Button::callback("⚙️ Settings", Action::Settings),
        ])
        .row(vec![Button::callback("☑️ INPUT / SEND FILE", Action::NewSeason)])
}

/// Main menu with a status line appended, e.g. after a transform.
pub fn main_menu_with_status(session: &Session, status: &str) -> Screen {
    let mut screen = main_menu(session);
    screen.text = format!("{}\n{}", screen.text, status);
    screen
}

pub fn transform_applied(session: &Session, kind: TransformKind) -> Screen {
    main_menu_with_status(session, &format!("✅ *Applied:* {}", kind.label()))
}

pub fn export_complete(session: &Session) -> Screen {
    main_menu_with_status(session, "✅ *EXPORT COMPLETE!*")
}

pub fn file_processed(session: &Session) -> Screen {
    let mut screen = main_menu(session);
    screen.text = format!("✅ *File processed!*\n\n{}", screen.text);
    screen
}

/// Prompt shown after "new season"; keeps the main menu buttons.
pub fn new_season(session: &Session) -> Screen {
    Screen {
        text: "✅ *New session started.*\nSend new numbers or upload a file.\n_You can still view the old numbers until new input is provided._".to_string(),
        keyboard: main_menu(session).keyboard,
    }
}

pub fn export_menu() -> Screen {
    let mut row: Vec<Button> = ExportFormat::ALL
        .into_iter()
        .map(|format| {
            Button::callback(format.extension().to_uppercase(), Action::ExportAs(format))
        })
        .collect();
    row.push(Button::callback("⬅ Back", Action::BackToMenu));
    Screen::with_keyboard("📤 *CHOOSE FORMAT:*", Keyboard::default().row(row))
}

pub fn settings_menu(settings: &SessionSettings) -> Screen {
    let keyboard = Keyboard::default()
        .row(vec![Button::callback(
            format!(
                "Show All: {}",
                if settings.show_all_enabled { "On" } else { "Off" }
            ),
            Action::ToggleShowAll,
        )])
        .row(vec![Button::callback(
            format!("Page size: {}", settings.per_page),
            Action::SetPerPage,
        )])
        .row(vec![Button::callback("⬅ Back", Action::BackToMenu)]);
    Screen::with_keyboard("⚙️ *Settings*\n\nToggle or set values:", keyboard)
}

pub fn per_page_prompt(settings: &SessionSettings) -> Screen {
    Screen::text(format!(
        "🔢 *SEND NEW PAGE SIZE* (current {}).",
        settings.per_page
    ))
}

pub fn large_dataset_warning(count: usize, limit: usize) -> Screen {
    Screen::text(format!(
        "⚠️ *Large Dataset Detected!*\n\n> *You’ve sent {count} numbers, exceeding {limit}.*\n\n📝 *Use a file for large sets.*\n⚡ *Processing anyway…*"
    ))
}

/// One page of the list with navigation.
pub fn page(view: &PageView) -> Screen {
    let text = format!(
        "📄 Viewing {}–{} of {}\n📍 Page {} of {}\n\n{}",
        view.start,
        view.end,
        view.total,
        view.page,
        view.pages,
        view.items.join("\n")
    );

    let mut nav = Vec::new();
    if let Some(offset) = view.prev_offset {
        nav.push(Button::callback(
            "⬅ Prev",
            Action::View {
                offset,
                show_all: view.show_all,
            },
        ));
    }
    if let Some(offset) = view.next_offset {
        nav.push(Button::callback(
            "Next ➡",
            Action::View {
                offset,
                show_all: view.show_all,
            },
        ));
    }

    let mut keyboard = Keyboard::default().row(nav);
    if view.offer_show_all {
        keyboard = keyboard.row(vec![Button::callback(
            "Show All",
            Action::View {
                offset: 0,
                show_all: true,
            },
        )]);
    }
    keyboard = keyboard.row(vec![Button::callback("⬅ Back", Action::BackToMenu)]);
    Screen::with_keyboard(text, keyboard)
}
