use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use crate::error::{ChannelError, DispatchError, IconError, IntentError};

use super::{
    Bitmap, ChannelHandle, ChannelSpec, FinalizeMode, IconHandle, NotificationHandle,
    NotificationPlatform, NotificationShell, PendingIntentHandle, PendingIntentSpec,
};

/// Dry-run platform: logs every port call and fabricates handles without
/// touching any OS service. Used by `--dry-run` and as the fallback backend
/// on hosts without a real notification stack.
#[derive(Debug, Default)]
pub struct TracePlatform {
    next_handle: AtomicU64,
}

impl TracePlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }
}

impl NotificationPlatform for TracePlatform {
    fn create_channel(&self, spec: &ChannelSpec) -> Result<ChannelHandle, ChannelError> {
        info!(
            channel_id = %spec.id,
            display_name = %spec.display_name,
            importance = ?spec.importance,
            "dry-run: would create channel"
        );
        Ok(ChannelHandle {
            id: spec.id.clone(),
            display_name: spec.display_name.clone(),
        })
    }

    fn register_channel(&self, channel: &ChannelHandle) -> Result<(), ChannelError> {
        info!(channel_id = %channel.id, "dry-run: would register channel");
        Ok(())
    }

    fn build_notification_shell(
        &self,
        channel_id: Option<&str>,
    ) -> Result<NotificationShell, DispatchError> {
        Ok(NotificationShell::bound_to(channel_id))
    }

    fn resolve_icon_resource(&self, name: &str) -> Result<IconHandle, IconError> {
        info!(resource = name, "dry-run: would resolve icon resource");
        let id = u32::try_from(self.next() % u64::from(u32::MAX)).unwrap_or_default();
        Ok(IconHandle(id))
    }

    fn decode_bitmap_from_resource(&self, icon: IconHandle) -> Result<Bitmap, IconError> {
        info!(icon = icon.0, "dry-run: would decode resource bitmap");
        Ok(Bitmap::default())
    }

    fn decode_bitmap_from_file(&self, path: &Path) -> Result<Bitmap, IconError> {
        info!(path = %path.display(), "dry-run: would decode bitmap file");
        Ok(Bitmap::default())
    }

    fn build_pending_intent(
        &self,
        spec: &PendingIntentSpec,
    ) -> Result<PendingIntentHandle, IntentError> {
        info!(
            action = ?spec.action,
            category = ?spec.category,
            mutability = ?spec.mutability,
            "dry-run: would build pending intent"
        );
        Ok(PendingIntentHandle(self.next()))
    }

    fn finalize_notification(
        &self,
        shell: NotificationShell,
        mode: FinalizeMode,
    ) -> Result<NotificationHandle, DispatchError> {
        info!(mode = ?mode, title = %shell.title, "dry-run: would finalize notification");
        Ok(NotificationHandle { shell })
    }

    fn post_notification(
        &self,
        slot: u32,
        notification: NotificationHandle,
    ) -> Result<(), DispatchError> {
        info!(
            slot,
            title = %notification.shell.title,
            channel_id = notification.shell.channel_id.as_deref().unwrap_or("<none>"),
            "dry-run: would post notification"
        );
        Ok(())
    }

    fn show_toast(&self, message: &str) -> Result<(), DispatchError> {
        info!(message, "dry-run: would show toast");
        Ok(())
    }
}
