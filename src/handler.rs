use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, Focus};
use crate::input::QUICK_ACTIONS;
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await?,
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {
            if app.session.follow_bottom {
                app.scroll_to_bottom();
            }
        }
        AppEvent::Tick => {
            app.tick();
            app.poll_reply().await;
        }
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any mode
    if ctrl && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    // Alert popup swallows everything until dismissed
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.alert = None;
        }
        return Ok(());
    }

    if app.show_model_picker {
        match key.code {
            KeyCode::Esc => app.show_model_picker = false,
            KeyCode::Char('j') | KeyCode::Down => app.model_picker_nav_down(),
            KeyCode::Char('k') | KeyCode::Up => app.model_picker_nav_up(),
            KeyCode::Enter => app.confirm_model_picker().await,
            _ => {}
        }
        return Ok(());
    }

    if ctrl {
        match key.code {
            KeyCode::Char('n') => {
                app.start_new_chat();
                return Ok(());
            }
            KeyCode::Char('l') => {
                app.open_model_picker();
                return Ok(());
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => {
            app.cycle_focus();
            return Ok(());
        }
        KeyCode::PageUp => {
            app.session.scroll_up(app.chat_height.max(2) / 2);
            return Ok(());
        }
        KeyCode::PageDown => {
            app.session.scroll_down(app.chat_height.max(2) / 2);
            return Ok(());
        }
        _ => {}
    }

    match app.focus {
        Focus::Input => handle_input_key(app, key),
        Focus::QuickActions => handle_quick_action_key(app, key),
        Focus::Transcript => handle_transcript_key(app, key),
    }
    Ok(())
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    let newline_modifier = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => {
            app.suggestion_state.select(None);
            app.focus = Focus::Transcript;
        }
        KeyCode::Enter if newline_modifier => app.input.insert_newline(),
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.insert_newline()
        }
        KeyCode::Enter => {
            match app.suggestion_state.selected() {
                Some(i) if app.suggestions_visible() => app.accept_suggestion(i),
                _ => {
                    app.send_message();
                }
            }
        }
        KeyCode::Up if app.suggestions_visible() => app.suggestion_nav(false),
        KeyCode::Down if app.suggestions_visible() => app.suggestion_nav(true),
        KeyCode::Up => app.session.scroll_up(1),
        KeyCode::Down => app.session.scroll_down(1),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.suggestion_state.select(None);
            app.input.insert(c);
        }
        _ => {}
    }
}

fn handle_quick_action_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.quick_action_nav(true),
        KeyCode::Char('k') | KeyCode::Up => app.quick_action_nav(false),
        KeyCode::Enter => {
            if let Some(i) = app.quick_action_state.selected() {
                app.send_quick_action(i);
            }
        }
        KeyCode::Char(c @ '1'..='9') => {
            let idx = c as usize - '1' as usize;
            if idx < QUICK_ACTIONS.len() {
                app.send_quick_action(idx);
            }
        }
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('i') => app.focus = Focus::Input,
        _ => {}
    }
}

fn handle_transcript_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.session.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.session.scroll_up(1),
        KeyCode::Char('g') => app.session.scroll_up(u16::MAX),
        KeyCode::Char('G') => app.scroll_to_bottom(),
        KeyCode::Char('n') => app.start_new_chat(),
        KeyCode::Char('m') => app.open_model_picker(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Enter | KeyCode::Esc => app.focus = Focus::Input,
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.session.scroll_down(3),
        MouseEventKind::ScrollUp => app.session.scroll_up(3),
        _ => {}
    }
}
