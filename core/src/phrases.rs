use std::collections::VecDeque;

use rand::Rng;

/// Shown in the completion dialog when no phrase is available.
pub const FALLBACK_PHRASE: &str = "愿你被世界温柔以待。";
const RECENT_LIMIT: usize = 3;

#[derive(Clone, Debug, Default)]
pub struct PhrasePicker {
    phrases: Vec<String>,
    recent: VecDeque<String>,
}

impl PhrasePicker {
    /// One phrase per line; blank lines are dropped.
    pub fn parse(text: &str) -> Self {
        let phrases = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            phrases,
            recent: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn pick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        if self.phrases.is_empty() {
            return None;
        }
        let fresh: Vec<&String> = self
            .phrases
            .iter()
            .filter(|phrase| !self.recent.contains(*phrase))
            .collect();
        let pool: Vec<&String> = if fresh.is_empty() {
            self.phrases.iter().collect()
        } else {
            fresh
        };
        let chosen = pool.get(rng.random_range(0..pool.len()))?.to_string();
        self.recent.push_back(chosen.clone());
        if self.recent.len() > RECENT_LIMIT {
            self.recent.pop_front();
        }
        Some(chosen)
    }
}
