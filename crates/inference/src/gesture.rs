use serde::{Deserialize, Serialize};
use std::fmt;

/// Gesture classes in the order of the classifier's output scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureLabel {
    Name,
    #[serde(rename = "I/Me")]
    IMe,
    Hello,
    Goodbye,
}

impl GestureLabel {
    pub const COUNT: usize = 4;

    pub const ALL: [GestureLabel; Self::COUNT] = [
        GestureLabel::Name,
        GestureLabel::IMe,
        GestureLabel::Hello,
        GestureLabel::Goodbye,
    ];

    /// Checked lookup from a score index. Out-of-range indices yield `None`.
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::Name => "Name",
            GestureLabel::IMe => "I/Me",
            GestureLabel::Hello => "Hello",
            GestureLabel::Goodbye => "Goodbye",
        }
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_index_is_total_and_injective() {
        let labels: HashSet<GestureLabel> = (0..GestureLabel::COUNT)
            .map(|i| GestureLabel::from_index(i).expect("index in range"))
            .collect();

        assert_eq!(labels.len(), GestureLabel::COUNT, "Every index maps to a distinct label");

        for label in GestureLabel::ALL {
            assert_eq!(GestureLabel::from_index(label.index()), Some(label));
        }
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        assert_eq!(GestureLabel::from_index(4), None);
        assert_eq!(GestureLabel::from_index(usize::MAX), None);
    }

    #[test]
    fn test_training_order() {
        assert_eq!(GestureLabel::from_index(0), Some(GestureLabel::Name));
        assert_eq!(GestureLabel::from_index(1), Some(GestureLabel::IMe));
        assert_eq!(GestureLabel::from_index(2), Some(GestureLabel::Hello));
        assert_eq!(GestureLabel::from_index(3), Some(GestureLabel::Goodbye));
    }

    #[test]
    fn test_serializes_as_display_name() {
        for label in GestureLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label));
        }
        assert_eq!(serde_json::to_string(&GestureLabel::IMe).unwrap(), "\"I/Me\"");
    }
}
