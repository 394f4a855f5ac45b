//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    /// Split a value on `separator`, trimming entries and dropping blanks.
    /// Returns `None` when the key is absent.
    fn get_list(&self, section: &str, key: &str, separator: char) -> Option<Vec<String>> {
        self.get_string(section, key).map(|value| {
            value
                .split(separator)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
    }
}
