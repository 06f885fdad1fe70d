use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::error::{ChannelError, DispatchError, IconError, IntentError};

use super::{
    Bitmap, ChannelHandle, ChannelSpec, FinalizeMode, IconHandle, LAUNCHER_ICON_RESOURCE,
    NotificationHandle, NotificationPlatform, NotificationShell, PendingIntentHandle,
    PendingIntentSpec,
};

const DEFAULT_TOAST_TIMEOUT: Duration = Duration::from_millis(3_500);

/// Stand-in for a themed launcher icon when the resource directory carries
/// no `icon.*` file. Real devices always have a launcher icon; a desktop
/// host falls back to the theme instead of failing the whole dispatch.
const THEMED_LAUNCHER_ICON: &str = "dialog-information";

#[derive(Clone, Debug, Eq, PartialEq)]
enum IconEntry {
    File(PathBuf),
    Themed(&'static str),
}

/// Desktop adapter for the platform port. The app's icon-resource table is
/// a directory keyed by file stem; posting and toasts go through the
/// host notification daemon (notify-rust on Linux, WinRT toasts on
/// Windows). Channels and pending intents have no desktop equivalent and
/// are accepted as logged no-ops so the capability branching upstream stays
/// observable.
pub struct DesktopPlatform {
    appname: String,
    resource_dir: Option<PathBuf>,
    toast_timeout: Duration,
    icons: Mutex<Vec<IconEntry>>,
    next_intent: AtomicU64,
}

impl DesktopPlatform {
    #[must_use]
    pub fn new(
        appname: impl Into<String>,
        resource_dir: Option<PathBuf>,
        toast_timeout: Option<Duration>,
    ) -> Self {
        Self {
            appname: appname.into(),
            resource_dir,
            toast_timeout: toast_timeout.unwrap_or(DEFAULT_TOAST_TIMEOUT),
            icons: Mutex::new(Vec::new()),
            next_intent: AtomicU64::new(1),
        }
    }

    // Re-resolving the same resource returns the existing handle, so the
    // table stays bounded by the number of distinct icons.
    fn register_icon(&self, entry: IconEntry) -> IconHandle {
        let mut icons = self.icons.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(index) = icons.iter().position(|known| *known == entry) {
            return IconHandle(u32::try_from(index).unwrap_or(u32::MAX));
        }
        icons.push(entry);
        let index = u32::try_from(icons.len() - 1).unwrap_or(u32::MAX);
        IconHandle(index)
    }

    fn icon_entry(&self, icon: IconHandle) -> Option<IconEntry> {
        let icons = self.icons.lock().unwrap_or_else(PoisonError::into_inner);
        icons.get(icon.0 as usize).cloned()
    }

    fn find_in_resource_dir(&self, name: &str) -> Option<PathBuf> {
        let dir = self.resource_dir.as_deref()?;
        let entries = std::fs::read_dir(dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.file_stem().is_some_and(|stem| stem == name) {
                return Some(path);
            }
        }
        None
    }

    fn icon_display_name(&self, icon: Option<IconHandle>) -> Option<String> {
        match icon.and_then(|handle| self.icon_entry(handle)) {
            Some(IconEntry::File(path)) => Some(path.to_string_lossy().into_owned()),
            Some(IconEntry::Themed(name)) => Some(name.to_string()),
            None => None,
        }
    }
}

impl NotificationPlatform for DesktopPlatform {
    fn create_channel(&self, spec: &ChannelSpec) -> Result<ChannelHandle, ChannelError> {
        debug!(
            channel_id = %spec.id,
            display_name = %spec.display_name,
            "desktop host has no channel registry; accepting channel"
        );
        Ok(ChannelHandle {
            id: spec.id.clone(),
            display_name: spec.display_name.clone(),
        })
    }

    fn register_channel(&self, channel: &ChannelHandle) -> Result<(), ChannelError> {
        debug!(channel_id = %channel.id, "channel registration accepted");
        Ok(())
    }

    fn build_notification_shell(
        &self,
        channel_id: Option<&str>,
    ) -> Result<NotificationShell, DispatchError> {
        Ok(NotificationShell::bound_to(channel_id))
    }

    fn resolve_icon_resource(&self, name: &str) -> Result<IconHandle, IconError> {
        if let Some(path) = self.find_in_resource_dir(name) {
            return Ok(self.register_icon(IconEntry::File(path)));
        }
        if name == LAUNCHER_ICON_RESOURCE {
            return Ok(self.register_icon(IconEntry::Themed(THEMED_LAUNCHER_ICON)));
        }
        Err(IconError::MissingResource {
            name: name.to_string(),
        })
    }

    fn decode_bitmap_from_resource(&self, icon: IconHandle) -> Result<Bitmap, IconError> {
        match self.icon_entry(icon) {
            Some(IconEntry::File(path)) => {
                let data = std::fs::read(&path)
                    .map_err(|source| IconError::DecodeFile { path, source })?;
                Ok(Bitmap { data })
            }
            // Themed icons live in the host theme, not on disk.
            Some(IconEntry::Themed(_)) => Ok(Bitmap::default()),
            None => Err(IconError::DecodeResource {
                message: format!("unknown icon handle {}", icon.0),
            }),
        }
    }

    fn decode_bitmap_from_file(&self, path: &Path) -> Result<Bitmap, IconError> {
        let data = std::fs::read(path).map_err(|source| IconError::DecodeFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Bitmap { data })
    }

    fn build_pending_intent(
        &self,
        spec: &PendingIntentSpec,
    ) -> Result<PendingIntentHandle, IntentError> {
        debug!(
            action = ?spec.action,
            category = ?spec.category,
            flags = ?spec.flags,
            mutability = ?spec.mutability,
            "desktop host cannot relaunch an activity; recording tap intent"
        );
        Ok(PendingIntentHandle(
            self.next_intent.fetch_add(1, Ordering::Relaxed),
        ))
    }

    fn finalize_notification(
        &self,
        shell: NotificationShell,
        mode: FinalizeMode,
    ) -> Result<NotificationHandle, DispatchError> {
        debug!(mode = ?mode, title = %shell.title, "finalizing notification");
        Ok(NotificationHandle { shell })
    }

    fn post_notification(
        &self,
        slot: u32,
        notification: NotificationHandle,
    ) -> Result<(), DispatchError> {
        let icon = self.icon_display_name(notification.shell.small_icon);
        backends::post(
            &self.appname,
            slot,
            &notification.shell,
            icon.as_deref(),
        )
    }

    fn show_toast(&self, message: &str) -> Result<(), DispatchError> {
        backends::toast(&self.appname, message, self.toast_timeout)
    }
}

#[cfg(target_os = "linux")]
mod backends {
    use std::time::Duration;

    use notify_rust::{Hint, Notification, Timeout};

    use crate::error::DispatchError;
    use crate::platform::NotificationShell;

    pub fn post(
        appname: &str,
        slot: u32,
        shell: &NotificationShell,
        icon: Option<&str>,
    ) -> Result<(), DispatchError> {
        let mut builder = Notification::new();
        builder
            .summary(&shell.title)
            .body(shell.big_text.as_deref().unwrap_or(&shell.text))
            .appname(appname)
            // Same slot id on every post, so the daemon replaces instead of
            // stacking.
            .id(slot);

        if let Some(icon) = icon {
            builder.icon(icon);
        }

        builder.show().map(|_| ()).map_err(|err| DispatchError::Post {
            slot,
            message: err.to_string(),
        })
    }

    pub fn toast(appname: &str, message: &str, timeout: Duration) -> Result<(), DispatchError> {
        #[allow(clippy::cast_possible_truncation)]
        let ms = timeout.as_millis().min(u128::from(u32::MAX)) as u32;
        Notification::new()
            .summary(appname)
            .body(message)
            .appname(appname)
            .hint(Hint::Transient(true))
            .timeout(Timeout::Milliseconds(ms))
            .show()
            .map(|_| ())
            .map_err(|err| DispatchError::Toast {
                message: err.to_string(),
            })
    }
}

#[cfg(target_os = "windows")]
mod backends {
    use std::time::Duration;

    use tauri_winrt_notification::{Duration as WinDuration, Toast};
    use windows::UI::Notifications::{NotificationSetting, ToastNotificationManager};
    use windows::core::HSTRING;

    use crate::error::DispatchError;
    use crate::platform::NotificationShell;

    pub fn post(
        appname: &str,
        slot: u32,
        shell: &NotificationShell,
        _icon: Option<&str>,
    ) -> Result<(), DispatchError> {
        let app_id = app_id(appname);
        probe_setting(app_id);

        Toast::new(app_id)
            .title(&shell.title)
            .text1(shell.big_text.as_deref().unwrap_or(&shell.text))
            .duration(WinDuration::Short)
            .show()
            .map_err(|err| DispatchError::Post {
                slot,
                message: err.to_string(),
            })
    }

    pub fn toast(appname: &str, message: &str, _timeout: Duration) -> Result<(), DispatchError> {
        Toast::new(app_id(appname))
            .text1(message)
            .duration(WinDuration::Short)
            .show()
            .map_err(|err| DispatchError::Toast {
                message: err.to_string(),
            })
    }

    fn app_id(appname: &str) -> &str {
        if appname.trim().is_empty() {
            Toast::POWERSHELL_APP_ID
        } else {
            appname
        }
    }

    fn probe_setting(app_id: &str) {
        match ToastNotificationManager::CreateToastNotifierWithId(&HSTRING::from(app_id)) {
            Ok(notifier) => {
                if let Ok(setting) = notifier.Setting() {
                    if setting != NotificationSetting::Enabled {
                        tracing::warn!(?setting, "toast notifications are disabled for this app");
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to query toast manager");
            }
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
mod backends {
    use std::time::Duration;

    use crate::error::DispatchError;
    use crate::platform::NotificationShell;

    pub fn post(
        _appname: &str,
        slot: u32,
        _shell: &NotificationShell,
        _icon: Option<&str>,
    ) -> Result<(), DispatchError> {
        Err(DispatchError::Post {
            slot,
            message: "no desktop notification backend on this platform".to_string(),
        })
    }

    pub fn toast(_appname: &str, _message: &str, _timeout: Duration) -> Result<(), DispatchError> {
        Err(DispatchError::Toast {
            message: "no desktop notification backend on this platform".to_string(),
        })
    }
}
