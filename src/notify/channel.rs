use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::ChannelError;
use crate::platform::{
    ChannelHandle, ChannelSpec, Importance, NotificationPlatform, PlatformCapabilities,
};

/// Lazily registers the process-wide notification channel and caches the
/// handle for the app lifetime. On SDK levels below the channel threshold
/// every call is a no-op.
pub struct ChannelManager {
    caps: PlatformCapabilities,
    channel_id: String,
    cached: Mutex<Option<ChannelHandle>>,
}

impl ChannelManager {
    pub fn new(caps: PlatformCapabilities, channel_id: impl Into<String>) -> Self {
        Self {
            caps,
            channel_id: channel_id.into(),
            cached: Mutex::new(None),
        }
    }

    /// Return the channel for this process, registering it on first use.
    ///
    /// The channel id is the app package identifier; the display name is
    /// the title of the first notification to arrive, which then sticks for
    /// the process lifetime. Later titles return the cached handle without
    /// touching the service, so a second logical channel identity can never
    /// appear. The lock is held across the create/register pair.
    ///
    /// # Errors
    ///
    /// Propagates the service's rejection of channel creation or
    /// registration.
    pub fn ensure<P: NotificationPlatform>(
        &self,
        port: &P,
        title: &str,
    ) -> Result<Option<ChannelHandle>, ChannelError> {
        if !self.caps.channel_required {
            return Ok(None);
        }

        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = cached.as_ref() {
            return Ok(Some(handle.clone()));
        }

        let spec = ChannelSpec {
            id: self.channel_id.clone(),
            display_name: title.to_string(),
            importance: Importance::Default,
        };
        let handle = port.create_channel(&spec)?;
        port.register_channel(&handle)?;
        debug!(
            channel_id = %handle.id,
            display_name = %handle.display_name,
            "notification channel registered"
        );
        *cached = Some(handle.clone());
        Ok(Some(handle))
    }
}
