use crate::config::Config;
use crate::services::UserError;
use crate::state::SharedState;

/// There is no HTTP route for granting admin rights; this is the only way.
pub async fn cmd_set_admin(config: Config, username: &str, admin: bool) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let username = username.trim().to_lowercase();

    match state.user_service.set_admin(&username, admin).await {
        Ok(()) if admin => println!("✓ {username} is now an admin"),
        Ok(()) => println!("✓ {username} is no longer an admin"),
        Err(UserError::UnknownUsername(name)) => {
            println!("No user named '{name}'.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_admin_unknown_user_is_reported_not_failed() {
        let mut config = Config::default();
        config.general.database_path = "sqlite::memory:".to_string();

        cmd_set_admin(config, "Nobody", true).await.unwrap();
    }
}
