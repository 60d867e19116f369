//! View routing and the access gate.

use crate::session::{has_wallet_access, User};

/// Top-level pages of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Internet,
    Wallet,
    Profile,
}

impl View {
    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Internet => "Private Internet",
            View::Wallet => "Finance",
            View::Profile => "My Profile",
        }
    }

    /// Views that show ads to free users.
    pub fn is_monetized(self) -> bool {
        matches!(self, View::Dashboard | View::Internet)
    }
}

/// Sidebar entries for the given viewer. Wallet only appears for Super Admin.
pub fn menu(user: &User) -> Vec<View> {
    let mut items = vec![View::Dashboard, View::Internet, View::Profile];
    if has_wallet_access(user) {
        items.insert(2, View::Wallet);
    }
    items
}

/// Resolves what the main pane renders for a requested view.
///
/// Returns `None` when the login screen should show instead, and also when a
/// viewer without wallet access asks for the wallet: the pane stays empty,
/// nothing redirects.
pub fn visible_page(requested: View, authenticated: bool, user: &User) -> Option<View> {
    if !authenticated {
        return None;
    }
    if requested == View::Wallet && !has_wallet_access(user) {
        return None;
    }
    Some(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::login;

    #[test]
    fn test_menu_for_owner_includes_wallet() {
        let user = User::default();
        assert_eq!(
            menu(&user),
            vec![View::Dashboard, View::Internet, View::Wallet, View::Profile]
        );
    }

    #[test]
    fn test_menu_for_admin_hides_wallet() {
        let user = login("admin@timor.tl");
        assert!(!menu(&user).contains(&View::Wallet));
    }

    #[test]
    fn test_wallet_renders_nothing_for_admin() {
        let user = login("admin@timor.tl");
        assert_eq!(visible_page(View::Wallet, true, &user), None);
        assert_eq!(visible_page(View::Internet, true, &user), Some(View::Internet));
    }

    #[test]
    fn test_unauthenticated_sees_no_page() {
        let user = User::default();
        assert_eq!(visible_page(View::Dashboard, false, &user), None);
    }

    #[test]
    fn test_monetized_views() {
        assert!(View::Dashboard.is_monetized());
        assert!(View::Internet.is_monetized());
        assert!(!View::Wallet.is_monetized());
        assert!(!View::Profile.is_monetized());
    }
}
