//! Diesel schema for user account persistence.

diesel::table! {
    /// Accounts that may sign in to the desk.
    user_accounts (id) {
        /// Account identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Normalized login email.
        #[max_length = 255]
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Access role.
        #[max_length = 20]
        role -> Varchar,
        /// Whether the account may sign in.
        active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
