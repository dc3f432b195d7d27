//! Demo accounts for a fresh in-memory user store.

use stables_core::error::CoreError;
use stables_core::users::{CreateUser, Role, UserStore};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// `(email, password, role, parking_zone)` for each demo account.
pub const DEMO_USERS: &[(&str, &str, Role, i64)] = &[
    ("student.01@utrgv.edu", "stables123", Role::User, 1),
    ("student.02@utrgv.edu", "stables123", Role::User, 2),
    ("student.03@utrgv.edu", "stables123", Role::User, 3),
    ("admin@utrgv.edu", "admin123", Role::Admin, 0),
];

/// Insert the demo accounts, skipping any email that already exists.
///
/// Returns the number of accounts created.
pub async fn seed_demo_users(store: &dyn UserStore) -> AppResult<usize> {
    let mut created = 0;
    for &(email, password, role, zone) in DEMO_USERS {
        let password_hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        let input = CreateUser {
            email: email.to_string(),
            password_hash,
            role,
            parking_zone: Some(zone),
        };
        match store.insert(input).await {
            Ok(_) => created += 1,
            Err(CoreError::Conflict(_)) => {
                tracing::debug!(email, "Demo user already exists");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use stables_core::users::InMemoryUserStore;

    use super::*;
    use crate::auth::password::verify_password;

    #[tokio::test]
    async fn seeds_each_demo_user_once() {
        let store = InMemoryUserStore::new();

        assert_eq!(seed_demo_users(&store).await.unwrap(), DEMO_USERS.len());
        assert_eq!(seed_demo_users(&store).await.unwrap(), 0);

        let admin = store.find_by_email("admin@utrgv.edu").await.unwrap().unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.parking_zone, Some(0));
        assert!(verify_password("admin123", &admin.password_hash).unwrap());
    }
}
