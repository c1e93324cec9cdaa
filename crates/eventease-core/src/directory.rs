//! Credential directory used by login and the admin user list

use eventease_api::Identity;
use eventease_config::UserRecord;

/// Fixed set of credential records
#[derive(Debug, Clone)]
pub struct CredentialDirectory {
    users: Vec<UserRecord>,
}

impl CredentialDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    /// Exact email match, then exact password match. The returned identity
    /// never carries the password.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Identity> {
        self.users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .map(UserRecord::identity)
    }

    /// Every known identity, in directory order
    pub fn users(&self) -> Vec<Identity> {
        self.users.iter().map(UserRecord::identity).collect()
    }

    /// Case-insensitive match on name, email or role
    pub fn search(&self, term: &str) -> Vec<Identity> {
        let needle = term.to_lowercase();
        self.users
            .iter()
            .filter(|u| {
                u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
                    || u.role.as_str().contains(&needle)
            })
            .map(UserRecord::identity)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for CredentialDirectory {
    fn default() -> Self {
        Self::new(eventease_config::default_users())
    }
}
