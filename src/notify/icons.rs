use std::path::Path;

use crate::error::IconError;
use crate::platform::{Bitmap, IconHandle, LAUNCHER_ICON_RESOURCE, NotificationPlatform};

/// Icons derived from one request. Never cached: the reference may differ
/// on every call.
#[derive(Clone, Debug)]
pub struct ResolvedIcons {
    pub small: IconHandle,
    pub large: Bitmap,
}

/// Resolve the status-bar and body icons for a request.
///
/// Without a reference both come from the app's own launcher icon. With a
/// `"<name>.<extension>"` reference the small icon is the `<name>` entry of
/// the icon-resource table and the large icon is decoded straight from the
/// referenced file, not from the table.
///
/// # Errors
///
/// A missing resource or undecodable bitmap fails the resolution; callers
/// see the failure, there is no fallback.
pub fn resolve<P: NotificationPlatform>(
    port: &P,
    icon_ref: Option<&str>,
) -> Result<ResolvedIcons, IconError> {
    match icon_ref {
        None => {
            let small = port.resolve_icon_resource(LAUNCHER_ICON_RESOURCE)?;
            let large = port.decode_bitmap_from_resource(small)?;
            Ok(ResolvedIcons { small, large })
        }
        Some(reference) => {
            let name = resource_name(reference)?;
            let small = port.resolve_icon_resource(name)?;
            let large = port.decode_bitmap_from_file(Path::new(reference))?;
            Ok(ResolvedIcons { small, large })
        }
    }
}

fn resource_name(reference: &str) -> Result<&str, IconError> {
    match reference.split('.').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(IconError::InvalidReference {
            reference: reference.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::resource_name;
    use crate::error::IconError;

    #[test]
    fn resource_name_strips_extension() {
        assert_eq!(resource_name("badge.png").ok(), Some("badge"));
        assert_eq!(resource_name("archive.tar.gz").ok(), Some("archive"));
        assert_eq!(resource_name("plain").ok(), Some("plain"));
    }

    #[test]
    fn empty_resource_name_is_rejected() {
        assert!(matches!(
            resource_name(".png"),
            Err(IconError::InvalidReference { .. })
        ));
        assert!(matches!(
            resource_name(""),
            Err(IconError::InvalidReference { .. })
        ));
    }
}
