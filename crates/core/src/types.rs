/// Entity ids are opaque strings. Durable rows use UUID v4 strings;
/// AI-generated issue batches use synthesized `ai-<millis>-<n>` ids.
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
