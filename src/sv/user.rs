use crate::{entity::user, prelude::*};

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn get_or_create(&self, id: i64) -> Result<user::Model> {
    if let Some(user) = user::Entity::find_by_id(id).one(self.db).await? {
      return Ok(user);
    }

    let now = Utc::now().naive_utc();
    let user = user::ActiveModel {
      id: Set(id),
      reg_date: Set(now),
      points: Set(0),
      invited_by: Set(None),
    };

    Ok(user.insert(self.db).await?)
  }

  pub async fn by_id(&self, id: i64) -> Result<Option<user::Model>> {
    let user = user::Entity::find_by_id(id).one(self.db).await?;
    Ok(user)
  }

  /// Bind the referring agent for a user (one level, set once)
  pub async fn set_invited_by(&self, id: i64, agent_id: i64) -> Result<()> {
    if id == agent_id {
      return Err(Error::InvalidArgs("Cannot refer yourself".into()));
    }

    let user = user::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    if user.invited_by.is_some() {
      return Err(Error::InvalidArgs("User already has a referrer".into()));
    }

    user::Entity::find_by_id(agent_id)
      .one(self.db)
      .await?
      .ok_or(Error::UserNotFound)?;

    user::ActiveModel { invited_by: Set(Some(agent_id)), ..user.into() }
      .update(self.db)
      .await?;

    Ok(())
  }
}
