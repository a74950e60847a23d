diesel::table! {
    datasets (id) {
        id -> Text,
        seq -> Int8,
        uuid -> Uuid,
        filename -> Text,
        storage_path -> Text,
        size_bytes -> Int8,
        uploaded_at -> Timestamptz,
    }
}
