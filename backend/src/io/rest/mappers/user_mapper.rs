use shared::{Profile, UpdateProfileRequest, User};

use crate::domain::commands::auth::{LoginCommand, RegisterCommand};
use crate::domain::commands::profile::UpdateProfileCommand;
use crate::domain::models::user::{Profile as DomainProfile, User as DomainUser};

pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: DomainUser) -> User {
        User {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            avatar: domain.avatar,
            phone: domain.phone,
            location: domain.location,
            date_of_birth: domain.date_of_birth,
            bio: domain.bio,
        }
    }

    pub fn to_profile_dto(domain: DomainProfile) -> Profile {
        Profile {
            id: domain.id,
            name: domain.name,
            email: domain.email,
            phone: domain.phone,
            location: domain.location,
            date_of_birth: domain.date_of_birth,
            bio: domain.bio,
        }
    }

    pub fn to_login_command(request: shared::LoginRequest) -> LoginCommand {
        LoginCommand {
            email: request.email,
            password: request.password,
        }
    }

    pub fn to_register_command(request: shared::RegisterRequest) -> RegisterCommand {
        RegisterCommand {
            name: request.name,
            email: request.email,
            phone: request.phone,
            password: request.password,
            confirm_password: request.confirm_password,
        }
    }

    pub fn to_update_command(request: UpdateProfileRequest) -> UpdateProfileCommand {
        UpdateProfileCommand {
            name: request.name,
            email: request.email,
            phone: request.phone,
            location: request.location,
            date_of_birth: request.date_of_birth,
            bio: request.bio,
        }
    }
}
