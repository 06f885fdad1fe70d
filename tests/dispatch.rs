#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use appnotify::error::{
    ChannelError, DispatchError, IconError, IntentError, NotifyError, Stage,
};
use appnotify::notify::{NOTIFICATION_SLOT, NotificationDispatcher};
use appnotify::platform::{
    Bitmap, ChannelHandle, ChannelSpec, FinalizeMode, IconHandle, Mutability, NotificationHandle,
    NotificationPlatform, NotificationShell, PendingIntentHandle, PendingIntentSpec,
    PlatformCapabilities,
};
use appnotify::types::NotificationRequest;

const PACKAGE_ID: &str = "org.example.app";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Call {
    CreateChannel { id: String, display_name: String },
    RegisterChannel { id: String },
    BuildShell { channel_id: Option<String> },
    ResolveIcon { name: String },
    DecodeResource { icon: IconHandle },
    DecodeFile { path: PathBuf },
    BuildPendingIntent { mutability: Mutability },
    Finalize { mode: FinalizeMode },
    Post { slot: u32 },
    Toast { message: String },
}

/// Port implementation that records every platform call and can be told to
/// fail specific operations.
#[derive(Clone, Default)]
struct RecordingPlatform {
    calls: Arc<Mutex<Vec<Call>>>,
    missing_resource: Option<String>,
    fail_channel: bool,
    fail_shell: bool,
    fail_intent: bool,
    fail_finalize: bool,
    fail_toast: bool,
}

impl RecordingPlatform {
    fn new() -> Self {
        Self::default()
    }

    fn with_missing_resource(name: &str) -> Self {
        Self {
            missing_resource: Some(name.to_string()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }
}

impl NotificationPlatform for RecordingPlatform {
    fn create_channel(&self, spec: &ChannelSpec) -> Result<ChannelHandle, ChannelError> {
        self.record(Call::CreateChannel {
            id: spec.id.clone(),
            display_name: spec.display_name.clone(),
        });
        if self.fail_channel {
            return Err(ChannelError::Rejected {
                id: spec.id.clone(),
                message: "channel quota exceeded".to_string(),
            });
        }
        Ok(ChannelHandle {
            id: spec.id.clone(),
            display_name: spec.display_name.clone(),
        })
    }

    fn register_channel(&self, channel: &ChannelHandle) -> Result<(), ChannelError> {
        self.record(Call::RegisterChannel {
            id: channel.id.clone(),
        });
        Ok(())
    }

    fn build_notification_shell(
        &self,
        channel_id: Option<&str>,
    ) -> Result<NotificationShell, DispatchError> {
        self.record(Call::BuildShell {
            channel_id: channel_id.map(str::to_string),
        });
        if self.fail_shell {
            return Err(DispatchError::Shell {
                message: "builder unavailable".to_string(),
            });
        }
        Ok(NotificationShell::bound_to(channel_id))
    }

    fn resolve_icon_resource(&self, name: &str) -> Result<IconHandle, IconError> {
        self.record(Call::ResolveIcon {
            name: name.to_string(),
        });
        if self.missing_resource.as_deref() == Some(name) {
            return Err(IconError::MissingResource {
                name: name.to_string(),
            });
        }
        Ok(IconHandle(7))
    }

    fn decode_bitmap_from_resource(&self, icon: IconHandle) -> Result<Bitmap, IconError> {
        self.record(Call::DecodeResource { icon });
        Ok(Bitmap {
            data: b"resource".to_vec(),
        })
    }

    fn decode_bitmap_from_file(&self, path: &Path) -> Result<Bitmap, IconError> {
        self.record(Call::DecodeFile {
            path: path.to_path_buf(),
        });
        Ok(Bitmap {
            data: b"file".to_vec(),
        })
    }

    fn build_pending_intent(
        &self,
        spec: &PendingIntentSpec,
    ) -> Result<PendingIntentHandle, IntentError> {
        self.record(Call::BuildPendingIntent {
            mutability: spec.mutability,
        });
        if self.fail_intent {
            return Err(IntentError::Rejected {
                message: "flags rejected".to_string(),
            });
        }
        Ok(PendingIntentHandle(1))
    }

    fn finalize_notification(
        &self,
        shell: NotificationShell,
        mode: FinalizeMode,
    ) -> Result<NotificationHandle, DispatchError> {
        self.record(Call::Finalize { mode });
        if self.fail_finalize {
            return Err(DispatchError::Finalize {
                message: "builder refused".to_string(),
            });
        }
        Ok(NotificationHandle { shell })
    }

    fn post_notification(
        &self,
        slot: u32,
        _notification: NotificationHandle,
    ) -> Result<(), DispatchError> {
        self.record(Call::Post { slot });
        Ok(())
    }

    fn show_toast(&self, message: &str) -> Result<(), DispatchError> {
        self.record(Call::Toast {
            message: message.to_string(),
        });
        if self.fail_toast {
            return Err(DispatchError::Toast {
                message: "backend gone".to_string(),
            });
        }
        Ok(())
    }
}

fn dispatcher(
    platform: RecordingPlatform,
    sdk_level: u32,
) -> NotificationDispatcher<RecordingPlatform> {
    NotificationDispatcher::new(
        platform,
        PlatformCapabilities::from_sdk_level(sdk_level),
        PACKAGE_ID,
    )
    .unwrap()
}

fn request(title: &str) -> NotificationRequest {
    NotificationRequest::new(title, "message body", "ticker text")
}

#[tokio::test]
async fn toast_only_touches_nothing_but_the_toast() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 33);

    dispatcher
        .notify(request("ignored").toast_only())
        .await
        .unwrap();

    assert_eq!(
        platform.calls(),
        vec![Call::Toast {
            message: "message body".to_string()
        }]
    );
}

#[tokio::test]
async fn channel_is_registered_once_per_process() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 33);

    dispatcher.notify(request("first title")).await.unwrap();
    dispatcher.notify(request("second title")).await.unwrap();

    assert_eq!(
        platform.count(|c| matches!(c, Call::CreateChannel { .. })),
        1
    );
    assert_eq!(
        platform.count(|c| matches!(c, Call::RegisterChannel { .. })),
        1
    );
    // The first title wins as the display name and sticks.
    assert!(platform.calls().contains(&Call::CreateChannel {
        id: PACKAGE_ID.to_string(),
        display_name: "first title".to_string(),
    }));
}

#[tokio::test]
async fn no_channel_below_the_threshold() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 25);

    dispatcher.notify(request("title")).await.unwrap();

    assert_eq!(platform.count(|c| matches!(c, Call::CreateChannel { .. })), 0);
    assert!(platform.calls().contains(&Call::BuildShell { channel_id: None }));
}

#[tokio::test]
async fn shell_is_bound_to_the_channel_on_modern_levels() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 26);

    dispatcher.notify(request("title")).await.unwrap();

    assert!(platform.calls().contains(&Call::BuildShell {
        channel_id: Some(PACKAGE_ID.to_string()),
    }));
}

#[tokio::test]
async fn default_icon_comes_from_the_launcher_resource() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 33);

    dispatcher.notify(request("title")).await.unwrap();

    let calls = platform.calls();
    assert!(calls.contains(&Call::ResolveIcon {
        name: "icon".to_string()
    }));
    assert!(calls.contains(&Call::DecodeResource {
        icon: IconHandle(7)
    }));
    assert_eq!(platform.count(|c| matches!(c, Call::DecodeFile { .. })), 0);
}

#[tokio::test]
async fn named_icon_resolves_resource_and_decodes_the_file() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 33);

    dispatcher
        .notify(request("title").with_icon("foo.png"))
        .await
        .unwrap();

    let calls = platform.calls();
    assert!(calls.contains(&Call::ResolveIcon {
        name: "foo".to_string()
    }));
    assert!(calls.contains(&Call::DecodeFile {
        path: PathBuf::from("foo.png")
    }));
    assert_eq!(
        platform.count(|c| matches!(c, Call::DecodeResource { .. })),
        0
    );
}

#[tokio::test]
async fn pending_intent_is_mutable_from_sdk_31() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 31);

    dispatcher.notify(request("title")).await.unwrap();

    assert!(platform.calls().contains(&Call::BuildPendingIntent {
        mutability: Mutability::Mutable
    }));
}

#[tokio::test]
async fn pending_intent_is_immutable_before_sdk_31() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 30);

    dispatcher.notify(request("title")).await.unwrap();

    assert!(platform.calls().contains(&Call::BuildPendingIntent {
        mutability: Mutability::Immutable
    }));
}

#[tokio::test]
async fn consecutive_posts_reuse_the_fixed_slot() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 33);

    dispatcher.notify(request("first")).await.unwrap();
    dispatcher.notify(request("second")).await.unwrap();

    let posts: Vec<_> = platform
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Post { .. }))
        .collect();
    assert_eq!(
        posts,
        vec![
            Call::Post {
                slot: NOTIFICATION_SLOT
            },
            Call::Post {
                slot: NOTIFICATION_SLOT
            }
        ]
    );
}

#[tokio::test]
async fn missing_icon_resource_aborts_before_any_post() {
    let platform = RecordingPlatform::with_missing_resource("ghost");
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher
        .notify(request("title").with_icon("ghost.png"))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Icon(IconError::MissingResource { name }) if name.as_str() == "ghost"
    ));
    assert_eq!(err.stage(), Stage::Icons);

    let calls = platform.calls();
    assert_eq!(platform.count(|c| matches!(c, Call::Finalize { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Post { .. })), 0);
    // The failed lookup is the last platform interaction.
    assert_eq!(
        calls.last(),
        Some(&Call::ResolveIcon {
            name: "ghost".to_string()
        })
    );
}

#[tokio::test]
async fn channel_rejection_aborts_before_the_shell_is_built() {
    let platform = RecordingPlatform {
        fail_channel: true,
        ..RecordingPlatform::new()
    };
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher.notify(request("title")).await.unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Channel(ChannelError::Rejected { id, .. }) if id.as_str() == PACKAGE_ID
    ));
    assert_eq!(err.stage(), Stage::Channel);

    let calls = platform.calls();
    assert_eq!(platform.count(|c| matches!(c, Call::BuildShell { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Finalize { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Post { .. })), 0);
    assert!(matches!(calls.last(), Some(Call::CreateChannel { .. })));
}

#[tokio::test]
async fn intent_rejection_aborts_before_finalize() {
    let platform = RecordingPlatform {
        fail_intent: true,
        ..RecordingPlatform::new()
    };
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher.notify(request("title")).await.unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Intent(IntentError::Rejected { .. })
    ));
    assert_eq!(err.stage(), Stage::ReopenIntent);

    let calls = platform.calls();
    assert_eq!(platform.count(|c| matches!(c, Call::Finalize { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Post { .. })), 0);
    assert!(matches!(calls.last(), Some(Call::BuildPendingIntent { .. })));
}

#[tokio::test]
async fn shell_failure_stops_the_pipeline_at_submit() {
    let platform = RecordingPlatform {
        fail_shell: true,
        ..RecordingPlatform::new()
    };
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher.notify(request("title")).await.unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Dispatch(DispatchError::Shell { .. })
    ));
    assert_eq!(err.stage(), Stage::Submit);

    let calls = platform.calls();
    assert_eq!(platform.count(|c| matches!(c, Call::ResolveIcon { .. })), 0);
    assert_eq!(platform.count(|c| matches!(c, Call::Post { .. })), 0);
    assert!(matches!(calls.last(), Some(Call::BuildShell { .. })));
}

#[tokio::test]
async fn finalize_failure_never_reaches_the_post() {
    let platform = RecordingPlatform {
        fail_finalize: true,
        ..RecordingPlatform::new()
    };
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher.notify(request("title")).await.unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Dispatch(DispatchError::Finalize { .. })
    ));
    assert_eq!(err.stage(), Stage::Submit);
    assert_eq!(platform.count(|c| matches!(c, Call::Post { .. })), 0);
}

#[tokio::test]
async fn legacy_levels_finalize_via_get_notification() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 15);

    dispatcher.notify(request("title")).await.unwrap();

    assert!(platform.calls().contains(&Call::Finalize {
        mode: FinalizeMode::GetNotification
    }));
}

#[tokio::test]
async fn modern_levels_finalize_via_build() {
    let platform = RecordingPlatform::new();
    let dispatcher = dispatcher(platform.clone(), 16);

    dispatcher.notify(request("title")).await.unwrap();

    assert!(platform.calls().contains(&Call::Finalize {
        mode: FinalizeMode::Build
    }));
}

#[tokio::test]
async fn toast_failure_is_reported_with_its_stage() {
    let platform = RecordingPlatform {
        fail_toast: true,
        ..RecordingPlatform::new()
    };
    let dispatcher = dispatcher(platform.clone(), 33);

    let err = dispatcher
        .notify(request("title").toast_only())
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        NotifyError::Dispatch(DispatchError::Toast { .. })
    ));
    assert_eq!(err.stage(), Stage::Toast);
}
