//! Per-user settings operations.

use sea_orm::{ActiveValue, EntityTrait};

use crate::{Engine, ResultEngine, period::resolve_timezone, settings};

impl Engine {
    /// Returns the user's stored timezone, falling back to UTC when none has
    /// been initialized yet.
    pub async fn user_timezone(&self, user_id: &str) -> ResultEngine<String> {
        let stored = settings::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?;

        Ok(stored
            .map(|row| row.timezone)
            .unwrap_or_else(|| "UTC".to_string()))
    }

    /// Returns the user's stored timezone, initializing it with `timezone`
    /// on first use.
    ///
    /// Once a row exists the stored value wins; the supplied one is only a
    /// seed. The seed is validated before it can be persisted.
    pub async fn user_timezone_or_init(
        &self,
        user_id: &str,
        timezone: &str,
    ) -> ResultEngine<String> {
        if let Some(existing) = settings::Entity::find_by_id(user_id)
            .one(&self.database)
            .await?
        {
            return Ok(existing.timezone);
        }

        resolve_timezone(timezone)?;
        let row = settings::ActiveModel {
            user_id: ActiveValue::Set(user_id.to_string()),
            timezone: ActiveValue::Set(timezone.to_string()),
        };
        settings::Entity::insert(row).exec(&self.database).await?;

        Ok(timezone.to_string())
    }
}
