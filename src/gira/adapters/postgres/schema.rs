//! Diesel schema for gira persistence.

diesel::table! {
    /// Service sessions.
    giras (id) {
        /// Gira identifier.
        id -> Uuid,
        /// Gira type reference.
        gira_type_id -> Uuid,
        /// `open` or `closed`.
        #[max_length = 20]
        status -> Varchar,
        /// Opening timestamp.
        opened_at -> Timestamptz,
        /// Closing timestamp, set exactly when closed.
        closed_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Practitioners marked present per gira.
    gira_presence (gira_id, practitioner_id) {
        /// Gira reference.
        gira_id -> Uuid,
        /// Practitioner reference.
        practitioner_id -> Uuid,
    }
}

diesel::table! {
    /// Consultant tickets.
    queue_entries (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Owning gira.
        gira_id -> Uuid,
        /// Consultant name.
        #[max_length = 200]
        consultant_name -> Varchar,
        /// Optional consultant phone.
        #[max_length = 50]
        consultant_phone -> Nullable<Varchar>,
        /// Per-gira ticket number.
        sequence_number -> Int8,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Practitioner serving or having served the entry.
        assigned_practitioner_id -> Nullable<Uuid>,
        /// Registration timestamp.
        created_at -> Timestamptz,
        /// Service start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Service end timestamp.
        finished_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(gira_presence -> giras (gira_id));
diesel::joinable!(queue_entries -> giras (gira_id));

diesel::allow_tables_to_appear_in_same_query!(giras, gira_presence, queue_entries);
