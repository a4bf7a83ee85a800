pub mod kv_entries;
