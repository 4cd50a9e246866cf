//! Diesel table definitions. Must match `backend/migrations`.

diesel::table! {
    /// JSON documents keyed by collection and id.
    documents (collection, id) {
        collection -> Text,
        id -> Uuid,
        body -> Jsonb,
        /// Optimistic concurrency counter, starting at 1.
        revision -> Int8,
        /// Insertion order within the table.
        seq -> Int8,
        updated_at -> Timestamptz,
    }
}
