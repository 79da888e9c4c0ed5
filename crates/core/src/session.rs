//! Who is using the clinic right now.
//!
//! There is no authentication: logging in selects one of the known users by ID, and role
//! switching jumps to the first user holding the requested role.

use crate::error::{ClinicError, ClinicResult};
use crate::models::{Profile, User, UserRole};
use crate::store::ClinicStore;

impl ClinicStore {
    /// Make `user_id` the current user.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::UserNotFound`] for an unknown ID; the session is unchanged.
    pub fn login(&mut self, user_id: &str) -> ClinicResult<User> {
        let user = self
            .user(user_id)
            .cloned()
            .ok_or_else(|| ClinicError::UserNotFound(user_id.to_string()))?;
        self.current_user = Some(user.id.clone());
        tracing::info!(user_id, role = %user.role, "user logged in");
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user_id) = self.current_user.take() {
            tracing::info!(%user_id, "user logged out");
        }
    }

    /// Replace the current user with the first user holding `role`.
    ///
    /// # Errors
    ///
    /// - [`ClinicError::NotLoggedIn`] when nobody is logged in.
    /// - [`ClinicError::NoUserForRole`] when no user has `role`.
    ///
    /// The session is unchanged on error.
    pub fn switch_role(&mut self, role: UserRole) -> ClinicResult<User> {
        if self.current_user.is_none() {
            return Err(ClinicError::NotLoggedIn);
        }
        let user = self
            .users
            .iter()
            .find(|u| u.role == role)
            .cloned()
            .ok_or(ClinicError::NoUserForRole(role))?;
        self.current_user = Some(user.id.clone());
        tracing::info!(user_id = %user.id, %role, "switched role");
        Ok(user)
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_deref().and_then(|id| self.user(id))
    }

    /// The current user's patient or professional record, if both resolve.
    pub fn current_profile(&self) -> Option<Profile> {
        let user = self.current_user()?;
        match user.role {
            UserRole::Patient => self.patient(&user.profile_id).cloned().map(Profile::Patient),
            UserRole::Professional => self
                .professional(&user.profile_id)
                .cloned()
                .map(Profile::Professional),
        }
    }

    /// The current user, who must hold `role`.
    pub(crate) fn require_role(&self, role: UserRole) -> ClinicResult<&User> {
        let user = self.current_user().ok_or(ClinicError::NotLoggedIn)?;
        if user.role != role {
            return Err(ClinicError::WrongRole {
                expected: role,
                actual: user.role,
            });
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::default_seed;
    use chrono::NaiveDate;

    fn store() -> ClinicStore {
        ClinicStore::from_seed(default_seed(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 1, 0))
    }

    #[test]
    fn login_and_logout() {
        let mut store = store();
        assert!(store.current_user().is_none());

        let user = store.login("user2").expect("known user");
        assert_eq!(user.name.as_str(), "João Santos");
        assert_eq!(store.current_user().map(|u| u.id.as_str()), Some("user2"));

        store.logout();
        assert!(store.current_user().is_none());
        assert!(store.current_profile().is_none());
    }

    #[test]
    fn unknown_login_keeps_current_session() {
        let mut store = store();
        store.login("user1").unwrap();

        let err = store.login("user9").expect_err("unknown user");
        assert!(matches!(err, ClinicError::UserNotFound(id) if id == "user9"));
        assert_eq!(store.current_user().map(|u| u.id.as_str()), Some("user1"));
    }

    #[test]
    fn current_profile_follows_role() {
        let mut store = store();
        store.login("user1").unwrap();
        match store.current_profile() {
            Some(Profile::Professional(p)) => assert_eq!(p.id, "prof1"),
            other => panic!("expected professional profile, got {other:?}"),
        }

        store.login("user3").unwrap();
        assert_eq!(store.current_profile().map(|p| p.id().to_string()), Some("pat2".into()));
    }

    #[test]
    fn switch_role_picks_first_user_with_role() {
        let mut store = store();
        store.login("user1").unwrap();

        let user = store.switch_role(UserRole::Patient).unwrap();
        assert_eq!(user.id, "user2");

        let user = store.switch_role(UserRole::Professional).unwrap();
        assert_eq!(user.id, "user1");
    }

    #[test]
    fn switch_role_requires_login() {
        let mut store = store();
        assert!(matches!(
            store.switch_role(UserRole::Patient),
            Err(ClinicError::NotLoggedIn)
        ));
        assert!(store.current_user().is_none());
    }

    #[test]
    fn switch_role_without_candidate_fails_and_keeps_user() {
        let mut seed = default_seed(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 1, 0);
        seed.users.retain(|u| u.role == UserRole::Patient);
        let mut store = ClinicStore::from_seed(seed);
        store.login("user2").unwrap();

        let err = store.switch_role(UserRole::Professional).unwrap_err();
        assert!(matches!(err, ClinicError::NoUserForRole(UserRole::Professional)));
        assert_eq!(store.current_user().map(|u| u.id.as_str()), Some("user2"));
    }

    #[test]
    fn dangling_profile_resolves_to_none() {
        let mut seed = default_seed(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 1, 0);
        seed.patients.retain(|p| p.id != "pat2");
        let mut store = ClinicStore::from_seed(seed);
        store.login("user3").unwrap();
        assert!(store.current_profile().is_none());
    }

    #[test]
    fn require_role_reports_mismatch() {
        let mut store = store();
        store.login("user2").unwrap();
        let err = store.require_role(UserRole::Professional).unwrap_err();
        assert!(matches!(
            err,
            ClinicError::WrongRole {
                expected: UserRole::Professional,
                actual: UserRole::Patient
            }
        ));
    }
}
