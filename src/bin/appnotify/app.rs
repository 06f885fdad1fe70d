use std::path::PathBuf;

use appnotify::Result;
use appnotify::config::{Config, SDK_LEVEL_BOUNDS};
use appnotify::error::{ConfigError, Error as AppError, NotifyError};
use appnotify::notify::NotificationDispatcher;
use appnotify::platform::desktop::DesktopPlatform;
use appnotify::platform::trace::TracePlatform;
use appnotify::platform::{NotificationPlatform, PlatformCapabilities};
use appnotify::telemetry::init_tracing;
use appnotify::types::NotificationRequest;
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "config.toml";

#[derive(Debug, Eq, PartialEq)]
enum Backend {
    Desktop,
    Trace,
}

/// `--dry-run` always selects the trace adapter; so do hosts where no real
/// notification backend is compiled in, instead of failing every post.
const fn select_backend(dry_run: bool) -> Backend {
    if dry_run || !cfg!(any(target_os = "linux", target_os = "windows")) {
        Backend::Trace
    } else {
        Backend::Desktop
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;

    if let Some(sdk_level) = cli.sdk_level {
        if !SDK_LEVEL_BOUNDS.contains(&sdk_level) {
            return Err(AppError::from(ConfigError::InvalidField {
                field: "cli.sdk_level",
                message: format!(
                    "expected between {} and {}, got {sdk_level}",
                    SDK_LEVEL_BOUNDS.start(),
                    SDK_LEVEL_BOUNDS.end()
                ),
            }));
        }
        config.sdk_level = sdk_level;
    }

    let caps = PlatformCapabilities::from_sdk_level(config.sdk_level);

    let port: Box<dyn NotificationPlatform> = match select_backend(cli.dry_run) {
        Backend::Trace => Box::new(TracePlatform::new()),
        Backend::Desktop => Box::new(DesktopPlatform::new(
            config.notify.appname.clone(),
            config.notify.resource_dir.clone(),
            config.notify.toast_timeout,
        )),
    };

    let dispatcher = NotificationDispatcher::new(port, caps, config.package_id.clone())
        .map_err(|err| AppError::from(NotifyError::from(err)))?;

    let mut request = NotificationRequest::new(cli.title, cli.message, cli.ticker);
    if let Some(icon) = cli.icon {
        request = request.with_icon(icon);
    }
    if cli.toast {
        request = request.toast_only();
    }

    info!(
        sdk_level = config.sdk_level,
        toast = request.toast_only,
        dry_run = cli.dry_run,
        "sending notification"
    );

    dispatcher
        .notify(request)
        .await
        .map_err(AppError::from)?;

    println!("Notification sent successfully.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Backend, select_backend};

    #[test]
    fn dry_run_always_selects_the_trace_backend() {
        assert_eq!(select_backend(true), Backend::Trace);
    }

    #[cfg(any(target_os = "linux", target_os = "windows"))]
    #[test]
    fn desktop_hosts_use_the_real_backend() {
        assert_eq!(select_backend(false), Backend::Desktop);
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    #[test]
    fn hosts_without_a_notification_stack_fall_back_to_trace() {
        assert_eq!(select_backend(false), Backend::Trace);
    }
}
