// Diesel table definitions for the tagmill schema.

diesel::table! {
    tags (id) {
        id -> BigInt,
        name -> Text,
        industry -> Nullable<Text>,
        rule -> Nullable<Text>,
        business -> Nullable<Text>,
        level -> Integer,
        pid -> Nullable<BigInt>,
        state -> Integer,
        remark -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    // Registry of wide-column (table, family) pairs that exist
    wide_tables (table_name, family) {
        table_name -> Text,
        family -> Text,
    }
}

diesel::table! {
    // One record per stored row: carries the optimistic-concurrency version
    wide_rows (table_name, family, row_key) {
        table_name -> Text,
        family -> Text,
        row_key -> Text,
        version -> BigInt,
    }
}

diesel::table! {
    wide_cells (table_name, family, row_key, qualifier) {
        table_name -> Text,
        family -> Text,
        row_key -> Text,
        qualifier -> Text,
        value -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(wide_rows, wide_cells);
