use serde::Serialize;

use crate::models::RANKED_CHOICES;

/// Policy ids in the order they were picked. Position is rank - 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RankedSelection {
    ids: Vec<String>,
}

impl RankedSelection {
    /// Adds `id` at the next rank, or removes it when already held. Adding
    /// while full does nothing.
    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.ids.iter().position(|held| held == id) {
            self.ids.remove(pos);
        } else if !self.is_full() {
            self.ids.push(id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() == RANKED_CHOICES
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn hint(&self) -> &'static str {
        match self.ids.len() {
            0 => "แตะเพื่อเลือกอันดับ 1",
            1 => "เลือกอันดับ 2 ต่อเลย",
            2 => "สุดท้าย! เลือกอันดับ 3",
            _ => "ครบแล้ว! กดปุ่มด้านล่างเพื่อไปต่อ",
        }
    }
}
