use serde::Deserialize;

/// Form payload for creating or renaming a list.
#[derive(Debug, Deserialize)]
pub struct ListForm {
    #[serde(default)]
    pub list_name: String,
}

impl ListForm {
    /// The submitted name without surrounding whitespace.
    pub fn name(&self) -> &str {
        self.list_name.trim()
    }
}
