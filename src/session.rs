//! Session model: who is looking at the dashboard and what they may do.
//!
//! Identity is produced by [`login`], mutated in place by profile edits, VIP
//! upgrades and the owner's role switch, and thrown away at logout. All role
//! checks go through [`has_wallet_access`] and [`is_owner`] so the menu, the
//! page gate and the owner controls can never disagree.

use crate::constants::{ADMIN_EMAIL, DEFAULT_AVATAR, OWNER_EMAIL};
use crate::error::Result;
use base64::Engine;
use std::path::Path;

/// Role label attached to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Role {
    /// The privileged role. Unlocks the wallet.
    #[default]
    SuperAdmin,
    /// Staff account.
    Admin,
    /// Free tier.
    User,
    /// Free user who bought the VIP plan.
    VipMember,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::SuperAdmin => write!(f, "Super Admin"),
            Role::Admin => write!(f, "Admin"),
            Role::User => write!(f, "User"),
            Role::VipMember => write!(f, "VIP Member"),
        }
    }
}

/// The current viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Remote URL or inline `data:` URI.
    pub avatar: String,
    pub is_vip: bool,
}

impl Default for User {
    /// The owner profile every fresh process starts with.
    fn default() -> Self {
        Self {
            id: "u-001".to_string(),
            name: "Kirenius Kollo".to_string(),
            email: OWNER_EMAIL.to_string(),
            role: Role::SuperAdmin,
            avatar: DEFAULT_AVATAR.to_string(),
            is_vip: true,
        }
    }
}

/// Partial profile edit. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Builds the session for a submitted email.
///
/// Only two addresses are special; everything else, including an empty
/// string, becomes a free user carrying the submitted email.
pub fn login(email: &str) -> User {
    let base = User::default();
    if email == OWNER_EMAIL {
        base
    } else if email == ADMIN_EMAIL {
        User {
            name: "Admin Staff".to_string(),
            email: email.to_string(),
            role: Role::Admin,
            is_vip: true,
            ..base
        }
    } else {
        User {
            name: "New User".to_string(),
            email: email.to_string(),
            role: Role::User,
            is_vip: false,
            ..base
        }
    }
}

/// Wallet menu entry and wallet page.
pub fn has_wallet_access(user: &User) -> bool {
    user.role == Role::SuperAdmin
}

/// Owner-only controls, matched on the exact owner email.
pub fn is_owner(user: &User) -> bool {
    user.email == OWNER_EMAIL
}

impl User {
    /// Swaps between Super Admin and User.
    pub fn toggle_role(&mut self) {
        self.role = if self.role == Role::SuperAdmin {
            Role::User
        } else {
            Role::SuperAdmin
        };
    }

    /// Applies a successful VIP purchase.
    pub fn upgrade_to_vip(&mut self) {
        self.is_vip = true;
        if self.role == Role::User {
            self.role = Role::VipMember;
        }
    }

    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
    }
}

/// Reads an image into an inline `data:` URI for the avatar field.
///
/// The whole file is loaded into memory; there is no size or type check.
pub fn read_avatar(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{payload}", mime_for(path)))
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_login_owner_gets_default_profile() {
        assert_eq!(login(OWNER_EMAIL), User::default());
    }

    #[test]
    fn test_login_admin() {
        let user = login("admin@timor.tl");
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_vip);
        assert_eq!(user.name, "Admin Staff");
        assert_eq!(user.email, "admin@timor.tl");
        assert!(!has_wallet_access(&user));
        assert!(!is_owner(&user));
    }

    #[test]
    fn test_login_fallback_is_free_user() {
        for email in ["someone@example.com", "", "ADMIN@timor.tl", " admin@timor.tl"] {
            let user = login(email);
            assert_eq!(
                user,
                User {
                    name: "New User".to_string(),
                    email: email.to_string(),
                    role: Role::User,
                    is_vip: false,
                    ..User::default()
                }
            );
        }
    }

    #[test]
    fn test_toggle_role_round_trip() {
        let mut user = User::default();
        user.toggle_role();
        assert_eq!(user.role, Role::User);
        assert!(!has_wallet_access(&user));
        // Email is untouched, so the owner can switch back
        assert!(is_owner(&user));
        user.toggle_role();
        assert_eq!(user.role, Role::SuperAdmin);
    }

    #[test]
    fn test_toggle_from_admin_grants_super_admin() {
        let mut user = login(ADMIN_EMAIL);
        user.toggle_role();
        assert_eq!(user.role, Role::SuperAdmin);
    }

    #[test]
    fn test_upgrade_promotes_free_user() {
        let mut user = login("free@example.com");
        user.upgrade_to_vip();
        assert!(user.is_vip);
        assert_eq!(user.role, Role::VipMember);

        let mut admin = login(ADMIN_EMAIL);
        admin.upgrade_to_vip();
        assert_eq!(admin.role, Role::Admin);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut user = User::default();
        user.apply(ProfileUpdate {
            name: Some("Kiren".to_string()),
            ..ProfileUpdate::default()
        });
        assert_eq!(user.name, "Kiren");
        assert_eq!(user.email, OWNER_EMAIL);
        assert_eq!(user.avatar, DEFAULT_AVATAR);
    }

    #[test]
    fn test_editing_owner_email_drops_owner_controls() {
        let mut user = User::default();
        user.apply(ProfileUpdate {
            email: Some("kiren@elsewhere.tl".to_string()),
            ..ProfileUpdate::default()
        });
        assert!(!is_owner(&user));
        assert!(has_wallet_access(&user));
    }

    #[test]
    fn test_role_display_labels() {
        assert_eq!(Role::SuperAdmin.to_string(), "Super Admin");
        assert_eq!(Role::VipMember.to_string(), "VIP Member");
    }

    #[test]
    fn test_read_avatar_builds_data_uri() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"abc").unwrap();
        let uri = read_avatar(file.path()).unwrap();
        assert_eq!(uri, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_read_avatar_missing_file() {
        assert!(read_avatar(Path::new("/definitely/not/here.png")).is_err());
    }
}
