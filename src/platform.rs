pub mod desktop;
pub mod trace;

use std::path::Path;

use crate::error::{ChannelError, DispatchError, IconError, IntentError};

/// SDK level from which notifications must declare a channel (Oreo).
pub const CHANNEL_REQUIRED_SDK: u32 = 26;
/// SDK level from which the builder finalizes via `build()` instead of the
/// legacy `getNotification()` step.
pub const MODERN_FINALIZE_SDK: u32 = 16;
/// SDK level from which pending intents must carry the mutable flag; older
/// levels reject it and require immutable.
pub const MUTABLE_INTENT_SDK: u32 = 31;

/// Symbolic name of the application's own launcher icon in the icon
/// resource table, as in a mobile drawable table's `icon` entry.
pub const LAUNCHER_ICON_RESOURCE: &str = "icon";

/// Version-dependent behavior, computed once from the reported SDK level and
/// threaded as a value so the branching stays testable with synthetic
/// capabilities.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlatformCapabilities {
    pub channel_required: bool,
    pub legacy_finalize: bool,
    pub mutable_pending_intents: bool,
}

impl PlatformCapabilities {
    #[must_use]
    pub const fn from_sdk_level(sdk_level: u32) -> Self {
        Self {
            channel_required: sdk_level >= CHANNEL_REQUIRED_SDK,
            legacy_finalize: sdk_level < MODERN_FINALIZE_SDK,
            mutable_pending_intents: sdk_level >= MUTABLE_INTENT_SDK,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Importance {
    Default,
}

/// What the ChannelManager asks the service to register. The id is the app
/// package identifier; the display name is user-facing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelSpec {
    pub id: String,
    pub display_name: String,
    pub importance: Importance,
}

/// Registered channel identity as handed back by the platform.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelHandle {
    pub id: String,
    pub display_name: String,
}

/// Opaque reference into the app's icon-resource table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IconHandle(pub u32);

/// Decoded image attached as the large notification icon. Contents are
/// adapter-defined; the core never inspects them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bitmap {
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mutability {
    Immutable,
    Mutable,
}

/// Tap behavior of the notification: relaunch the app's own entry activity
/// the same way the launcher would.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingIntentSpec {
    pub action: IntentAction,
    pub category: IntentCategory,
    pub flags: LaunchFlags,
    pub mutability: Mutability,
    pub request_code: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntentAction {
    Main,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IntentCategory {
    Launcher,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LaunchFlags {
    SingleTop,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingIntentHandle(pub u64);

/// In-progress notification object. The dispatcher populates it field by
/// field; the platform turns it into a posted notification.
#[derive(Clone, Debug, Default)]
pub struct NotificationShell {
    pub channel_id: Option<String>,
    pub title: String,
    pub text: String,
    pub ticker: String,
    pub big_text: Option<String>,
    pub small_icon: Option<IconHandle>,
    pub large_icon: Option<Bitmap>,
    pub content_intent: Option<PendingIntentHandle>,
    pub auto_cancel: bool,
}

impl NotificationShell {
    #[must_use]
    pub fn bound_to(channel_id: Option<&str>) -> Self {
        Self {
            channel_id: channel_id.map(str::to_string),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FinalizeMode {
    /// `build()` on SDK >= 16.
    Build,
    /// `getNotification()` on older levels.
    GetNotification,
}

/// Finalized notification object; exists only between finalize and post
/// within a single dispatch.
#[derive(Clone, Debug)]
pub struct NotificationHandle {
    pub shell: NotificationShell,
}

/// Seam between the version-branching core and the OS notification stack.
/// Every platform-specific call goes through here, so the core can be
/// exercised against a recording implementation and shipped against a
/// per-OS adapter.
pub trait NotificationPlatform: Send + Sync + 'static {
    fn create_channel(&self, spec: &ChannelSpec) -> Result<ChannelHandle, ChannelError>;

    fn register_channel(&self, channel: &ChannelHandle) -> Result<(), ChannelError>;

    fn build_notification_shell(
        &self,
        channel_id: Option<&str>,
    ) -> Result<NotificationShell, DispatchError>;

    fn resolve_icon_resource(&self, name: &str) -> Result<IconHandle, IconError>;

    fn decode_bitmap_from_resource(&self, icon: IconHandle) -> Result<Bitmap, IconError>;

    fn decode_bitmap_from_file(&self, path: &Path) -> Result<Bitmap, IconError>;

    fn build_pending_intent(
        &self,
        spec: &PendingIntentSpec,
    ) -> Result<PendingIntentHandle, IntentError>;

    fn finalize_notification(
        &self,
        shell: NotificationShell,
        mode: FinalizeMode,
    ) -> Result<NotificationHandle, DispatchError>;

    fn post_notification(
        &self,
        slot: u32,
        notification: NotificationHandle,
    ) -> Result<(), DispatchError>;

    fn show_toast(&self, message: &str) -> Result<(), DispatchError>;
}

impl<P: NotificationPlatform + ?Sized> NotificationPlatform for Box<P> {
    fn create_channel(&self, spec: &ChannelSpec) -> Result<ChannelHandle, ChannelError> {
        (**self).create_channel(spec)
    }

    fn register_channel(&self, channel: &ChannelHandle) -> Result<(), ChannelError> {
        (**self).register_channel(channel)
    }

    fn build_notification_shell(
        &self,
        channel_id: Option<&str>,
    ) -> Result<NotificationShell, DispatchError> {
        (**self).build_notification_shell(channel_id)
    }

    fn resolve_icon_resource(&self, name: &str) -> Result<IconHandle, IconError> {
        (**self).resolve_icon_resource(name)
    }

    fn decode_bitmap_from_resource(&self, icon: IconHandle) -> Result<Bitmap, IconError> {
        (**self).decode_bitmap_from_resource(icon)
    }

    fn decode_bitmap_from_file(&self, path: &Path) -> Result<Bitmap, IconError> {
        (**self).decode_bitmap_from_file(path)
    }

    fn build_pending_intent(
        &self,
        spec: &PendingIntentSpec,
    ) -> Result<PendingIntentHandle, IntentError> {
        (**self).build_pending_intent(spec)
    }

    fn finalize_notification(
        &self,
        shell: NotificationShell,
        mode: FinalizeMode,
    ) -> Result<NotificationHandle, DispatchError> {
        (**self).finalize_notification(shell, mode)
    }

    fn post_notification(
        &self,
        slot: u32,
        notification: NotificationHandle,
    ) -> Result<(), DispatchError> {
        (**self).post_notification(slot, notification)
    }

    fn show_toast(&self, message: &str) -> Result<(), DispatchError> {
        (**self).show_toast(message)
    }
}
