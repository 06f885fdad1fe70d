pub mod channel;
pub mod icons;
pub mod intent;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{DispatchError, NotifyError};
use crate::platform::{FinalizeMode, NotificationPlatform, PlatformCapabilities};
use crate::types::NotificationRequest;
use crate::ui::UiContext;

pub use channel::ChannelManager;
pub use icons::ResolvedIcons;

/// Every notification posts under this slot, so a new post replaces the
/// previous notification instead of stacking a second one.
pub const NOTIFICATION_SLOT: u32 = 0;

/// Orchestrates one notification per call: channel, shell, content, icons,
/// reopen action, finalize, post — or just a toast. The only state shared
/// across calls is the channel cache.
pub struct NotificationDispatcher<P> {
    inner: Arc<Inner<P>>,
    ui: UiContext,
}

struct Inner<P> {
    port: P,
    caps: PlatformCapabilities,
    channels: ChannelManager,
}

impl<P: NotificationPlatform> NotificationDispatcher<P> {
    /// Build a dispatcher owning its own UI context thread. `package_id`
    /// becomes the channel id on channel-requiring SDK levels.
    ///
    /// # Errors
    ///
    /// Returns an error if the UI context thread cannot be spawned.
    pub fn new(
        port: P,
        caps: PlatformCapabilities,
        package_id: impl Into<String>,
    ) -> Result<Self, DispatchError> {
        let ui = UiContext::spawn()?;
        Ok(Self::with_ui_context(port, caps, package_id, ui))
    }

    /// Build a dispatcher marshaling onto an existing UI context.
    pub fn with_ui_context(
        port: P,
        caps: PlatformCapabilities,
        package_id: impl Into<String>,
        ui: UiContext,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                port,
                caps,
                channels: ChannelManager::new(caps, package_id),
            }),
            ui,
        }
    }

    /// Send one notification (or toast). The whole body runs on the UI
    /// context; the caller suspends until it completed or failed. No
    /// retries: the first failure is tagged with its stage and returned.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever stage failed; see
    /// [`NotifyError::stage`].
    pub async fn notify(&self, request: NotificationRequest) -> Result<(), NotifyError> {
        let inner = Arc::clone(&self.inner);
        let result = self
            .ui
            .run(move || inner.dispatch(&request))
            .await
            .map_err(NotifyError::from)?;

        if let Err(err) = &result {
            warn!(stage = %err.stage(), error = %err, "notification dispatch failed");
        }
        result
    }
}

impl<P: NotificationPlatform> Inner<P> {
    fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        if request.toast_only {
            self.port.show_toast(&request.message)?;
            debug!("toast shown");
            return Ok(());
        }

        let channel = self.channels.ensure(&self.port, &request.title)?;
        let channel_id = channel.as_ref().map(|handle| handle.id.as_str());
        let mut shell = self.port.build_notification_shell(channel_id)?;

        shell.title = request.title.clone();
        shell.text = request.message.clone();
        shell.ticker = request.ticker.clone();
        // Big-text style so the full message is readable when expanded.
        shell.big_text = Some(request.message.clone());

        let icons = icons::resolve(&self.port, request.icon.as_deref())?;
        shell.small_icon = Some(icons.small);
        shell.large_icon = Some(icons.large);

        shell.content_intent = Some(intent::build(&self.port, self.caps)?);
        // Tapping the notification dismisses it.
        shell.auto_cancel = true;

        let handle = self
            .port
            .finalize_notification(shell, finalize_mode(self.caps))?;
        self.port.post_notification(NOTIFICATION_SLOT, handle)?;

        info!(
            slot = NOTIFICATION_SLOT,
            title = %request.title,
            channel = channel_id.unwrap_or("<none>"),
            "notification posted"
        );
        Ok(())
    }
}

const fn finalize_mode(caps: PlatformCapabilities) -> FinalizeMode {
    if caps.legacy_finalize {
        FinalizeMode::GetNotification
    } else {
        FinalizeMode::Build
    }
}
