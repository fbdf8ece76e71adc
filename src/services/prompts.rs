//! Fixed user-facing strings.
//!
//! Everything the dashboard writes into a conversation or shows as a form
//! error lives here so wording stays consistent between the library and the
//! shell.

// ============================================================================
// DISPATCH OUTCOMES
// ============================================================================

/// Assistant message appended when a call comes back 401.
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// Assistant message appended when a call fails without a server message.
pub const GENERIC_FAILURE: &str = "Sorry, I encountered an error. Please try again.";

/// Inline notice shown when a structured response cannot be decoded.
pub const RENDER_PARSE_FAILED: &str =
    "Failed to parse standards response. Please check the response format.";

pub fn uploaded_file_message(file_name: &str) -> String {
    format!("Uploaded file: {}", file_name)
}

// ============================================================================
// FORM VALIDATION
// ============================================================================

pub mod auth_messages {
    pub const NAME_TOO_SHORT: &str = "Name must be at least 3 characters";
    pub const NAME_REQUIRED: &str = "Name is required";
    pub const NAME_EMPTY: &str = "Name cannot be empty";
    pub const EMAIL_REQUIRED: &str = "Email is required";
    pub const EMAIL_INVALID: &str = "Invalid email format";
    pub const PASSWORD_REQUIRED: &str = "Password is required";
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
    pub const NEW_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
    pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
    pub const NEW_PASSWORD_MISMATCH: &str = "New passwords do not match";
    pub const CONFIRM_REQUIRED: &str = "Please confirm your password";

    pub const SIGNUP_FAILED: &str = "Signup Failed.";
    pub const LOGIN_FAILED: &str = "Login failed.";
    pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";
    pub const PASSWORD_UPDATE_FAILED: &str = "Failed to update password";
}

pub mod upload_messages {
    pub fn too_many_files(max_files: usize) -> String {
        format!("You can only upload up to {} files", max_files)
    }

    pub fn unsupported_type(accepted: &[&str]) -> String {
        format!(
            "File type not supported. Please upload {} files.",
            accepted.join(", ")
        )
    }

    pub fn too_large(max_bytes: u64) -> String {
        format!(
            "File size exceeds the limit of {}MB.",
            max_bytes / (1024 * 1024)
        )
    }
}

pub mod journal_messages {
    pub const NO_ENTRIES: &str = "Add at least one journal entry";
    pub const ACCOUNT_REQUIRED: &str = "Every entry needs an account name";
    pub const AMOUNT_INVALID: &str = "Debit and credit must be non-negative numbers";
}
