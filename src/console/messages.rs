//! Operator-facing wording for failures.

/// Shown when the request never reached the server.
pub const NETWORK_ERROR: &str = "Network error. Please check your internet connection.";

/// Server messages that are reworded for the operator, matched by substring.
const SUBSTITUTIONS: [(&str, &str); 3] = [
    ("Invalid credentials", "Incorrect email or password."),
    ("User not found", "No account found with that email."),
    ("Missing", "Please fill in all fields."),
];

/// Reword a server message; anything unrecognised is shown as-is.
pub fn friendly(message: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map(|(_, replacement)| replacement.to_string())
        .unwrap_or_else(|| message.to_string())
}
