//! Diesel schema for catalog persistence.

diesel::table! {
    /// Practitioner roles ("functions").
    practitioner_roles (id) {
        /// Role identifier.
        id -> Uuid,
        /// Unique role name.
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    /// Gira types.
    gira_types (id) {
        /// Gira type identifier.
        id -> Uuid,
        /// Unique gira type name.
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    /// Practitioners who may be marked present.
    practitioners (id) {
        /// Practitioner identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Optional role reference.
        role_id -> Nullable<Uuid>,
        /// Whether the practitioner is listed.
        active -> Bool,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(practitioners -> practitioner_roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(practitioner_roles, gira_types, practitioners);
