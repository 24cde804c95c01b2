//! Persona editor: the channel profile being edited and its analysis state

use crate::ai::split_keywords;
use crate::error::ReplyError;
use crate::types::ChannelProfile;

/// Editable fields of the persona form, in display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersonaField {
    /// Doubles as the channel identifier for analysis
    #[default]
    Name,
    Description,
    Keywords,
    Tone,
}

impl PersonaField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Description, Self::Keywords, Self::Tone];

    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::Keywords,
            Self::Keywords => Self::Tone,
            Self::Tone => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Tone,
            Self::Description => Self::Name,
            Self::Keywords => Self::Description,
            Self::Tone => Self::Keywords,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Channel URL, ID, or Name",
            Self::Description => "Channel Description",
            Self::Keywords => "Style Keywords",
            Self::Tone => "Tone",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PersonaEditor {
    pub profile: ChannelProfile,
    pub field: PersonaField,
    /// Keyword being typed, added on Enter
    pub keyword_input: String,
    /// Highlighted keyword chip; `None` while typing a new one
    pub keyword_cursor: Option<usize>,
    pub analyzing: bool,
    analysis_seq: u64,
}

impl PersonaEditor {
    pub fn set_field(&mut self, field: PersonaField) {
        self.field = field;
        self.keyword_cursor = None;
    }

    pub fn push_char(&mut self, c: char) {
        match self.field {
            PersonaField::Name => self.profile.name.push(c),
            PersonaField::Description => self.profile.description.push(c),
            PersonaField::Keywords => {
                self.keyword_cursor = None;
                self.keyword_input.push(c);
            }
            PersonaField::Tone => {}
        }
    }

    /// On the keywords field, Backspace removes the highlighted keyword, or
    /// the last one when the input is empty
    pub fn backspace(&mut self) {
        match self.field {
            PersonaField::Name => {
                self.profile.name.pop();
            }
            PersonaField::Description => {
                self.profile.description.pop();
            }
            PersonaField::Keywords => {
                if self.keyword_cursor.is_some() || self.keyword_input.pop().is_none() {
                    self.remove_keyword();
                }
            }
            PersonaField::Tone => {}
        }
    }

    /// Add the typed keyword(s); comma-separated input adds several.
    ///
    /// Returns how many were added.
    pub fn commit_keyword(&mut self) -> usize {
        let input = std::mem::take(&mut self.keyword_input);
        let mut added = 0;
        for keyword in split_keywords(&input) {
            if !self.profile.style_keywords.contains(&keyword) {
                self.profile.style_keywords.push(keyword);
                added += 1;
            }
        }
        added
    }

    /// Move the highlight across the keyword chips. Moving right past the
    /// last chip returns to the text input.
    pub fn move_keyword_cursor(&mut self, forward: bool) {
        let len = self.profile.style_keywords.len();
        if len == 0 {
            self.keyword_cursor = None;
            return;
        }
        self.keyword_cursor = match (self.keyword_cursor, forward) {
            (None, false) => Some(len - 1),
            (None, true) => None,
            (Some(i), false) => Some(i.saturating_sub(1)),
            (Some(i), true) if i + 1 < len => Some(i + 1),
            (Some(_), true) => None,
        };
    }

    /// Remove the highlighted keyword, or the last one when none is
    /// highlighted
    pub fn remove_keyword(&mut self) -> Option<String> {
        let keywords = &mut self.profile.style_keywords;
        let index = match self.keyword_cursor {
            Some(i) if i < keywords.len() => i,
            _ => keywords.len().checked_sub(1)?,
        };
        let removed = keywords.remove(index);
        if self.keyword_cursor.is_some() {
            self.keyword_cursor = (!keywords.is_empty()).then(|| index.min(keywords.len() - 1));
        }
        Some(removed)
    }

    pub fn cycle_tone(&mut self, forward: bool) {
        self.profile.tone = if forward {
            self.profile.tone.next()
        } else {
            self.profile.tone.prev()
        };
    }

    /// Start an analysis of the name field; returns `(seq, identifier)`
    pub fn begin_analysis(&mut self) -> Option<(u64, String)> {
        let identifier = self.profile.name.trim();
        if self.analyzing || identifier.is_empty() {
            return None;
        }
        let identifier = identifier.to_string();
        self.analysis_seq += 1;
        self.analyzing = true;
        Some((self.analysis_seq, identifier))
    }

    /// Apply an analysis result; `Ok(false)` means it was superseded
    pub fn finish_analysis(
        &mut self,
        seq: u64,
        result: Result<ChannelProfile, ReplyError>,
    ) -> Result<bool, ReplyError> {
        if !self.analyzing || seq != self.analysis_seq {
            tracing::debug!("Dropping stale analysis result #{}", seq);
            return Ok(false);
        }
        self.analyzing = false;
        self.profile = result?;
        self.keyword_cursor = None;
        Ok(true)
    }
}
