use thiserror::Error;
use tracing::info;

use super::auth_service::{AuthError, AuthService};
use super::commands::profile::UpdateProfileCommand;
use super::date_format::parse_iso_date;
use super::models::user::{Profile, User};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("Veuillez vous connecter")]
    NotAuthenticated,
    #[error("Le nom est obligatoire")]
    EmptyName,
    #[error("Adresse email invalide")]
    InvalidEmail,
    #[error("Date de naissance invalide (format attendu AAAA-MM-JJ)")]
    InvalidDateOfBirth,
}

impl From<AuthError> for ProfileError {
    fn from(_: AuthError) -> Self {
        ProfileError::NotAuthenticated
    }
}

/// Profile of the signed-in user
#[derive(Clone)]
pub struct ProfileService {
    auth_service: AuthService,
}

impl ProfileService {
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }

    pub fn get_profile(&self) -> Result<Profile, ProfileError> {
        let user = self.auth_service.require_user()?;
        Ok(Profile::from_user(&user))
    }

    pub fn update_profile(&self, command: UpdateProfileCommand) -> Result<Profile, ProfileError> {
        let current = self.auth_service.require_user()?;
        info!("Updating profile for user {}", current.id);

        let updated = apply_update(current, command)?;
        self.auth_service.replace_user(updated.clone())?;
        Ok(Profile::from_user(&updated))
    }
}

fn apply_update(mut user: User, command: UpdateProfileCommand) -> Result<User, ProfileError> {
    if let Some(name) = command.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        user.name = name.to_string();
    }

    if let Some(email) = command.email {
        let email = email.trim();
        if !email.contains('@') {
            return Err(ProfileError::InvalidEmail);
        }
        user.email = email.to_string();
    }

    if let Some(date_of_birth) = command.date_of_birth {
        let date_of_birth = date_of_birth.trim();
        if date_of_birth.is_empty() {
            user.date_of_birth = None;
        } else if parse_iso_date(date_of_birth).is_some() {
            user.date_of_birth = Some(date_of_birth.to_string());
        } else {
            return Err(ProfileError::InvalidDateOfBirth);
        }
    }

    if let Some(phone) = command.phone {
        user.phone = Some(phone.trim().to_string()).filter(|p| !p.is_empty());
    }
    if let Some(location) = command.location {
        user.location = Some(location.trim().to_string()).filter(|l| !l.is_empty());
    }
    if let Some(bio) = command.bio {
        user.bio = Some(bio.trim().to_string()).filter(|b| !b.is_empty());
    }

    Ok(user)
}
