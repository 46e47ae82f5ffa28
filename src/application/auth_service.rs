use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, Signup, User};

use super::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate a signup and turn it into a storable account.
pub(crate) fn new_account(signup: Signup, role: Role) -> Result<NewUser, DomainError> {
    signup.validate()?;
    Ok(NewUser {
        name: signup.name.trim().to_string(),
        email: normalize_email(&signup.email),
        password_hash: hash_password(&signup.password)?,
        phone: signup.phone.trim().to_string(),
        role,
    })
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub fn register(&self, signup: Signup) -> Result<User, DomainError> {
        let account = new_account(signup, Role::Customer)?;
        if self.users.find_by_email(&account.email)?.is_some() {
            return Err(DomainError::Conflict("user already exists".to_string()));
        }
        let user = self.users.create(account)?;
        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let user = self
            .users
            .find_by_email(&normalize_email(email))?
            .ok_or(DomainError::Unauthorized)?;

        if verify_password(password, &user.password_hash) {
            Ok(user)
        } else {
            log::debug!("Rejected login for {}", user.id);
            Err(DomainError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;

    fn signup(email: &str) -> Signup {
        Signup {
            name: "Ravi".into(),
            email: email.into(),
            password: "secret-pass".into(),
            phone: "9876543210".into(),
        }
    }

    #[test]
    fn register_then_login() {
        let auth = AuthService::new(Arc::new(MemoryStore::new()));
        let user = auth.register(signup("Ravi@Example.com ")).unwrap();
        assert_eq!(user.email, "ravi@example.com");
        assert_eq!(user.role, Role::Customer);
        assert_ne!(user.password_hash, "secret-pass");

        let logged_in = auth.login("ravi@example.com", "secret-pass").unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let auth = AuthService::new(Arc::new(MemoryStore::new()));
        auth.register(signup("a@b.in")).unwrap();
        assert!(matches!(
            auth.login("a@b.in", "nope"),
            Err(DomainError::Unauthorized)
        ));
        assert!(matches!(
            auth.login("missing@b.in", "secret-pass"),
            Err(DomainError::Unauthorized)
        ));
    }

    #[test]
    fn duplicate_registration_conflicts() {
        let auth = AuthService::new(Arc::new(MemoryStore::new()));
        auth.register(signup("a@b.in")).unwrap();
        assert!(matches!(
            auth.register(signup("A@B.in")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let auth = AuthService::new(Arc::new(MemoryStore::new()));
        let mut s = signup("a@b.in");
        s.phone = " ".into();
        assert!(matches!(auth.register(s), Err(DomainError::InvalidInput(_))));
    }
}
