use crate::error::IntentError;
use crate::platform::{
    IntentAction, IntentCategory, LaunchFlags, Mutability, NotificationPlatform,
    PendingIntentHandle, PendingIntentSpec, PlatformCapabilities,
};

/// Describe the "tap to reopen the app" action: the app's own entry
/// activity, launched the way the home-screen icon would launch it. The
/// mutability flag follows the capability value; SDK 31+ rejects immutable
/// here, older levels reject mutable.
#[must_use]
pub const fn reopen_spec(caps: PlatformCapabilities) -> PendingIntentSpec {
    PendingIntentSpec {
        action: IntentAction::Main,
        category: IntentCategory::Launcher,
        flags: LaunchFlags::SingleTop,
        mutability: if caps.mutable_pending_intents {
            Mutability::Mutable
        } else {
            Mutability::Immutable
        },
        request_code: 0,
    }
}

/// Build the reopen action through the platform port.
///
/// # Errors
///
/// Propagates the platform's rejection of the pending intent.
pub fn build<P: NotificationPlatform>(
    port: &P,
    caps: PlatformCapabilities,
) -> Result<PendingIntentHandle, IntentError> {
    port.build_pending_intent(&reopen_spec(caps))
}
