//! Operator notification messages for lifecycle transitions.

/// The only notification channel currently in use.
pub const CHANNEL_WHATSAPP: &str = "whatsapp";

/// Shown in failure messages when the callback carried no error detail.
pub const FALLBACK_ERROR_HINT: &str = "Check logs for details";

/// Shown in success messages when the callback carried no URL.
pub const MISSING_URL_HINT: &str = "URL not reported";

/// The launch fields a message refers to.
#[derive(Debug, Clone, Copy)]
pub struct LaunchLabel<'a> {
    pub product_name: &'a str,
    pub slug: &'a str,
}

/// What happened to the launch.
#[derive(Debug, Clone, Copy)]
pub enum NotificationEvent<'a> {
    Started,
    Succeeded { deployment_url: Option<&'a str> },
    Failed { error_details: Option<&'a str> },
}

/// Format the operator message for a lifecycle transition.
pub fn format_notification(launch: LaunchLabel<'_>, event: NotificationEvent<'_>) -> String {
    let LaunchLabel { product_name, slug } = launch;
    match event {
        NotificationEvent::Started => format!(
            "\u{1F680} Deployment started for \"{product_name}\" ({slug}). Status: In Progress"
        ),
        NotificationEvent::Succeeded { deployment_url } => {
            let url = present(deployment_url).unwrap_or(MISSING_URL_HINT);
            format!(
                "\u{2705} SUCCESS: \"{product_name}\" ({slug}) deployed successfully!\n\u{1F517} {url}"
            )
        }
        NotificationEvent::Failed { error_details } => {
            let hint = present(error_details).unwrap_or(FALLBACK_ERROR_HINT);
            format!(
                "\u{274C} FAILED: \"{product_name}\" ({slug}) deployment failed.\n\u{1F4A1} {hint}"
            )
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
