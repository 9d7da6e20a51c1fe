//! Plain-text bodies for account lifecycle emails.

/// Build the subject and body for an email verification message.
///
/// The link carries both the email and the token so the frontend can
/// post them straight to `/auth/verify-email`.
pub fn verification_email(
    name: &str,
    email: &str,
    token: &str,
    frontend_url: &str,
) -> (String, String) {
    let link = format!("{frontend_url}/auth/verify-email?email={email}&token={token}");
    let subject = "Verify your Dosewise email address".to_string();
    let body = format!(
        "Hi {name},\n\n\
         Welcome to Dosewise! Please confirm your email address by opening\n\
         the link below. The link is valid for 24 hours.\n\n\
         {link}\n\n\
         If you did not create a Dosewise account, you can ignore this email.\n"
    );
    (subject, body)
}

/// Build the subject and body for a password reset message.
pub fn password_reset_email(
    name: &str,
    email: &str,
    token: &str,
    frontend_url: &str,
) -> (String, String) {
    let link = format!("{frontend_url}/auth/reset-password?email={email}&token={token}");
    let subject = "Reset your Dosewise password".to_string();
    let body = format!(
        "Hi {name},\n\n\
         We received a request to reset your Dosewise password. Open the\n\
         link below to choose a new one. The link is valid for 1 hour.\n\n\
         {link}\n\n\
         If you did not request a reset, no action is needed; your password\n\
         is unchanged.\n"
    );
    (subject, body)
}
