//! First-run profile creation

use crate::controller::ProgressionController;
use crate::error::ControllerError;
use crate::notice::Notice;
use mq_progress::{Avatar, Path, UserId, UserProgress};
use tracing::info;

impl ProgressionController {
    /// Create the user's profile: level 1, no XP, empty collections.
    ///
    /// Fails without writing if the name is blank or a profile exists.
    pub async fn begin_journey(
        &self,
        user: &UserId,
        display_name: &str,
        avatar: u8,
        path: Path,
    ) -> Result<UserProgress, ControllerError> {
        let result = self.try_begin_journey(user, display_name, avatar, path).await;
        self.reported(result, "Could not start your journey")
    }

    async fn try_begin_journey(
        &self,
        user: &UserId,
        display_name: &str,
        avatar: u8,
        path: Path,
    ) -> Result<UserProgress, ControllerError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(ControllerError::validation("Please enter a name to begin your journey."));
        }
        let avatar = Avatar::find(avatar)?;
        let progress = UserProgress::new(name, avatar.url, path);

        self.store.create(user, progress.clone()).await?;
        info!(%user, path = path.id(), avatar = avatar.name, "journey started");
        self.notices.notify(Notice::Success(format!("Welcome, {name}! Your journey begins.")));
        Ok(progress)
    }
}
