//! Configuration access port trait.

/// Sectioned key/value lookup. Typed getters return `Ok(None)` when the key
/// is absent and `Err` carrying the raw text when it does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String>;
}
