/// Flat set of parameters for one notification, supplied by the caller and
/// owned by the call. `icon` is either absent (use the app launcher icon) or
/// a `"<name>.<extension>"` reference resolved per call; `toast_only`
/// short-circuits the whole construction pipeline.
#[derive(Clone, Debug)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub ticker: String,
    pub icon: Option<String>,
    pub toast_only: bool,
}

impl NotificationRequest {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        ticker: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ticker: ticker.into(),
            icon: None,
            toast_only: false,
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn toast_only(mut self) -> Self {
        self.toast_only = true;
        self
    }
}
