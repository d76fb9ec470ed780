//! Users 业务服务

use tracing::debug;

use super::{
    model::{NewUser, User},
    repository::UserRepository,
};
use crate::core::error::CoreError;

#[derive(Clone, Debug)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    pub async fn get_user(&self, id: i64) -> Result<User, CoreError> {
        match self.users.find(id).await? {
            Some(user) => Ok(user),
            None => {
                debug!(user_id = id, "user not found");
                Err(CoreError::NotFound(format!("user {} does not exist", id)))
            }
        }
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, CoreError> {
        Ok(self.users.create(user).await?)
    }
}
