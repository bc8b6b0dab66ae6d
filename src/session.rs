use log::{debug, warn};

use crate::api::user::UserProfile;
use crate::storage::{Storage, StoreError};

/// Persists the bearer token and the user profile. Only this type writes the two
/// session keys; everything else reads the session through the auth context.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Storage,
}

impl SessionStore {
    pub const TOKEN_KEY: &'static str = "authToken";
    pub const USER_KEY: &'static str = "user";

    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn save_token(&self, token: &str) {
        self.storage.set(Self::TOKEN_KEY, token);
    }

    pub fn load_token(&self) -> Option<String> {
        self.storage
            .get(Self::TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn clear_token(&self) {
        self.storage.remove(Self::TOKEN_KEY);
    }

    pub fn save_user(&self, profile: &UserProfile) {
        match serde_json::to_string(profile) {
            Ok(json) => self.storage.set(Self::USER_KEY, &json),
            Err(err) => warn!("Encode user profile failed, profile is not persisted: {err}"),
        }
    }

    /// Reads the stored profile. A profile that cannot be decoded, or is not valid, is
    /// removed before returning `None`, so the next read finds clean storage.
    pub fn load_user(&self) -> Option<UserProfile> {
        let json = self.storage.get(Self::USER_KEY)?;
        let profile: UserProfile = match serde_json::from_str(&json) {
            Ok(profile) => profile,
            Err(err) => {
                warn!("Stored user profile is corrupted, clearing it: {err}");
                self.clear_user();
                return None;
            }
        };

        if !profile.is_valid() {
            warn!("Stored user profile has no id or email, clearing it");
            self.clear_user();
            return None;
        }
        Some(profile)
    }

    pub fn clear_user(&self) {
        self.storage.remove(Self::USER_KEY);
    }

    /// Writes token and profile as one unit. When the profile cannot be written the
    /// token is taken back out, a token is never left behind on its own.
    pub fn save(&self, token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        let json = match serde_json::to_string(profile) {
            Ok(json) => json,
            Err(err) => return Err(StoreError::Unavailable(format!("encode profile: {err}"))),
        };

        self.storage.try_set(Self::TOKEN_KEY, token)?;
        if let Err(err) = self.storage.try_set(Self::USER_KEY, &json) {
            self.clear_token();
            return Err(err);
        }
        debug!("Session saved for user {}", profile.email);
        Ok(())
    }

    pub fn clear(&self) {
        self.clear_token();
        self.clear_user();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::storage::{KvStore, MemoryStore};

    use super::*;

    fn setup() -> (Arc<MemoryStore>, SessionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = SessionStore::new(Storage::from_arc(backend.clone()));
        (backend, store)
    }

    #[test]
    fn test_token() {
        let (_, store) = setup();
        assert_eq!(store.load_token(), None);

        store.save_token("abc");
        assert_eq!(store.load_token().as_deref(), Some("abc"));

        store.clear_token();
        assert_eq!(store.load_token(), None);

        store.save_token("");
        assert_eq!(store.load_token(), None);
    }

    #[test]
    fn test_user_round_trip() {
        let (_, store) = setup();
        let mut profile = UserProfile::new(1, "a@b.com");
        profile.first_name = String::from("Ada");

        store.save_user(&profile);
        assert_eq!(store.load_user(), Some(profile));

        store.clear_user();
        assert_eq!(store.load_user(), None);
    }

    #[test]
    fn test_self_healing_read() {
        for corrupted in [
            "{not json",
            r#"{"id":1}"#,
            r#"{"email":"a@b.com"}"#,
            r#"{"id":"","email":"a@b.com"}"#,
            "[]",
        ] {
            let (backend, store) = setup();
            backend.store(SessionStore::USER_KEY, corrupted).unwrap();

            assert_eq!(store.load_user(), None, "{corrupted}");
            // Cleaned up by the first read.
            assert_eq!(backend.load(SessionStore::USER_KEY).unwrap(), None);
            assert_eq!(store.load_user(), None);
        }
    }

    #[test]
    fn test_save_pair() {
        let (backend, store) = setup();
        let profile = UserProfile::new("u-9", "a@b.com");

        store.save("tok", &profile).unwrap();
        assert_eq!(store.load_token().as_deref(), Some("tok"));
        assert_eq!(store.load_user(), Some(profile.clone()));

        store.clear();
        assert_eq!(store.load_token(), None);
        assert_eq!(store.load_user(), None);
        assert!(backend.is_empty());

        backend.set_failing(true);
        assert!(store.save("tok", &profile).is_err());
        backend.set_failing(false);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_failing_storage_reads_as_empty() {
        let (backend, store) = setup();
        store.save("tok", &UserProfile::new(1, "a@b.com")).unwrap();

        backend.set_failing(true);
        assert_eq!(store.load_token(), None);
        assert_eq!(store.load_user(), None);
        store.clear();

        backend.set_failing(false);
        assert_eq!(store.load_token().as_deref(), Some("tok"));
    }

    /// Accepts the token but refuses the profile, to exercise the rollback.
    struct RejectUser(MemoryStore);

    impl KvStore for RejectUser {
        fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.load(key)
        }

        fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if key == SessionStore::USER_KEY {
                return Err(StoreError::Unavailable(String::from("quota exceeded")));
            }
            self.0.store(key, value)
        }

        fn delete(&self, key: &str) -> Result<(), StoreError> {
            self.0.delete(key)
        }
    }

    #[test]
    fn test_save_rolls_back_token() {
        let store = SessionStore::new(Storage::new(RejectUser(MemoryStore::new())));
        let result = store.save("tok", &UserProfile::new(1, "a@b.com"));
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.load_token(), None);
    }
}
