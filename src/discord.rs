//! Discord implementation of the presence service
//!
//! Talks to the local Discord client over its IPC socket via
//! `discord-rich-presence`. The IPC crate reports boxed errors, so they
//! are flattened into `anyhow` messages at this boundary.

use anyhow::{Result, anyhow};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient, activity};
use tracing::debug;

use crate::service::{PresenceService, PresenceUpdate};

/// Presence service backed by the local Discord client.
#[derive(Debug, Default)]
pub struct DiscordService;

impl PresenceService for DiscordService {
    type Conn = DiscordIpcClient;

    fn connect(&mut self, client_id: &str) -> Result<DiscordIpcClient> {
        let mut client = DiscordIpcClient::new(client_id)
            .map_err(|e| anyhow!("failed to create Discord IPC client: {e}"))?;
        client
            .connect()
            .map_err(|e| anyhow!("Discord IPC handshake failed: {e}"))?;
        debug!(client_id = %client_id, "connected to Discord IPC");
        Ok(client)
    }

    fn update(&mut self, conn: &mut DiscordIpcClient, update: &PresenceUpdate) -> Result<()> {
        conn.set_activity(build_activity(update))
            .map_err(|e| anyhow!("failed to set activity: {e}"))
    }

    fn clear(&mut self, conn: &mut DiscordIpcClient) -> Result<()> {
        conn.clear_activity()
            .map_err(|e| anyhow!("failed to clear activity: {e}"))
    }

    fn close(&mut self, mut conn: DiscordIpcClient) -> Result<()> {
        conn.close()
            .map_err(|e| anyhow!("failed to close Discord IPC connection: {e}"))
    }
}

/// Translate the payload into a wire activity. Absent fields stay unset
/// so the client does not render them.
fn build_activity(update: &PresenceUpdate) -> activity::Activity<'_> {
    let mut assets = activity::Assets::new().large_image(&update.large_image);
    if let Some(text) = update.large_image_tooltip.as_deref() {
        assets = assets.large_text(text);
    }
    if let Some(image) = update.small_image.as_deref() {
        assets = assets.small_image(image);
    }
    if let Some(text) = update.small_image_tooltip.as_deref() {
        assets = assets.small_text(text);
    }

    let mut act = activity::Activity::new().assets(assets);
    if let Some(details) = update.details.as_deref() {
        act = act.details(details);
    }
    if let Some(state) = update.state.as_deref() {
        act = act.state(state);
    }
    if let Some(start) = update.start {
        act = act.timestamps(activity::Timestamps::new().start(start));
    }
    act
}
