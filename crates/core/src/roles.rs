//! Well-known role name constants.
//!
//! These must match the `ck_profiles_role` constraint in the `profiles` table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VIEWER: &str = "viewer";

/// Roles allowed to create and edit content.
pub const CONTENT_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

/// Whether `role` may create, edit, publish and duplicate content.
pub fn can_edit(role: &str) -> bool {
    CONTENT_ROLES.contains(&role)
}

/// Whether `role` may soft-delete content.
pub fn can_delete(role: &str) -> bool {
    role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editors_can_edit_but_not_delete() {
        assert!(can_edit(ROLE_EDITOR));
        assert!(!can_delete(ROLE_EDITOR));
    }

    #[test]
    fn admins_can_do_everything() {
        assert!(can_edit(ROLE_ADMIN));
        assert!(can_delete(ROLE_ADMIN));
    }

    #[test]
    fn viewers_are_read_only() {
        assert!(!can_edit(ROLE_VIEWER));
        assert!(!can_delete(ROLE_VIEWER));
        assert!(!can_edit(""));
    }
}
