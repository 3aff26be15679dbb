use chrono::Duration;

/// Builds `<dashboard_url>/password/reset/<token>`.
pub fn reset_link(dashboard_url: &str, token: &str) -> String {
    format!("{}/password/reset/{token}", dashboard_url.trim_end_matches('/'))
}

pub fn welcome_message(full_name: &str) -> (String, String) {
    let subject = "Welcome to your portfolio dashboard".to_owned();
    let body = format!(
        "Hello {full_name},\n\n\
         Your account has been created. You can now sign in to the dashboard \
         and start filling in your portfolio.\n"
    );
    (subject, body)
}

pub fn password_reset_message(link: &str, valid_for: Duration) -> (String, String) {
    let subject = "Portfolio dashboard password recovery".to_owned();
    let body = format!(
        "Your reset password link is:\n\n{link}\n\n\
         The link is valid for {} minutes. If you did not request it, ignore this mail.\n",
        valid_for.num_minutes()
    );
    (subject, body)
}
