use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{io::PersistentHandler, types::err};

/// Colours which may be assigned to a feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    DarkGreen,
    LightGreen,
    Cyan,
    LightGray,
    Blue,
    Magenta,
    Pink,
}

/// A named assignment of colours to features.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,

    pub colors: BTreeMap<String, Color>,
}

/// Keeps the colour schemes of a model, and which scheme is active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSchemeHandler {
    pub schemes: Vec<ColorScheme>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
}

impl ColorSchemeHandler {
    /// The colour of a feature in the active scheme.
    pub fn color_of(&self, feature: &str) -> Option<Color> {
        let active = self.active.as_deref()?;
        self.schemes
            .iter()
            .find(|scheme| scheme.name == active)?
            .colors
            .get(feature)
            .copied()
    }
}

impl PersistentHandler for ColorSchemeHandler {
    fn suffix(&self) -> &str {
        "colors"
    }

    fn read(&mut self, content: &str) -> Result<(), err::FormatError> {
        *self = serde_json::from_str(content)?;
        Ok(())
    }

    fn write(&self) -> Result<String, err::FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_scheme() {
        let mut handler = ColorSchemeHandler::default();
        let mut scheme = ColorScheme {
            name: "review".to_owned(),
            ..Default::default()
        };
        scheme.colors.insert("Radio".to_owned(), Color::DarkGreen);
        handler.schemes.push(scheme);

        assert_eq!(handler.color_of("Radio"), None);
        handler.active = Some("review".to_owned());
        assert_eq!(handler.color_of("Radio"), Some(Color::DarkGreen));

        let content = handler.write().unwrap();
        assert!(content.contains("dark_green"));

        let mut fresh = ColorSchemeHandler::default();
        fresh.read(&content).unwrap();
        assert_eq!(fresh, handler);
    }
}
