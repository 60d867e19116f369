//! UI rendering module

mod dashboard;
mod internet;
mod login;
mod overlays;
mod profile;
mod wallet;
mod widgets;

use crate::app::{App, InputMode};
use ratatui::Frame;

/// Main render function - dispatches to appropriate view
pub fn render(frame: &mut Frame, app: &App) {
    if !app.authenticated {
        login::render(frame, app);
    } else {
        dashboard::render(frame, app);

        match &app.input_mode {
            InputMode::Normal => {}
            InputMode::Payment => overlays::payment::render(frame, app),
            InputMode::Withdraw => overlays::withdraw::render(frame, app),
            InputMode::Share { selected } => overlays::share::render(frame, *selected),
            InputMode::EditProfile { focus, name, email } => {
                overlays::profile::render_edit(frame, *focus, name, email);
            }
            InputMode::AvatarPath { path } => overlays::profile::render_avatar_path(frame, path),
        }

        if app.show_help {
            overlays::help::render(frame, app);
        }
    }

    // Render toast notification if present
    if app.toast.is_some() {
        overlays::toast::render(frame, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::View;
    use crate::constants::ADMIN_EMAIL;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_every_page_renders() {
        let mut app = App::for_tests();
        for view in [View::Dashboard, View::Internet, View::Wallet, View::Profile] {
            app.request_view(view);
            let screen = draw(&app);
            assert!(screen.contains(view.title()), "{view:?} title missing");
        }
    }

    #[test]
    fn test_login_screen_when_signed_out() {
        let mut app = App::for_tests();
        app.logout();
        let screen = draw(&app);
        assert!(screen.contains("Sign in"));
        assert!(!screen.contains("Event Log"));
    }

    #[test]
    fn test_admin_wallet_pane_is_blank() {
        let mut app = App::for_tests();
        app.login(ADMIN_EMAIL);
        app.request_view(View::Wallet);
        let screen = draw(&app);
        assert!(!screen.contains("Transactions"));
        assert!(!screen.contains("Withdraw"));
    }

    #[test]
    fn test_overlays_render() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.open_upgrade();
        assert!(draw(&app).contains("Upgrade to VIP"));

        app.input_mode = InputMode::Share { selected: 2 };
        assert!(draw(&app).contains("WhatsApp"));

        app.input_mode = InputMode::Normal;
        app.show_help = true;
        assert!(draw(&app).contains("GLOBAL CONTROLS"));
    }

    #[test]
    fn test_live_revenue_badge_after_impression() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        assert!(!draw(&app).contains("LIVE REVENUE"));
        app.advance(Duration::from_millis(500));
        assert!(draw(&app).contains("LIVE REVENUE"));
    }

    #[test]
    fn test_connected_internet_page_renders() {
        let mut app = App::for_tests();
        app.request_view(View::Internet);
        app.toggle_power();
        app.advance(Duration::from_secs(6));
        let screen = draw(&app);
        assert!(screen.contains("SECURE & ENCRYPTED"));
        assert!(screen.contains("Dili"));
    }
}
