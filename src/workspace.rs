//! Session workspace: the comment list, the draft inputs and the reply in progress
//!
//! All transitions are plain `&mut self` methods. Remote calls happen elsewhere;
//! the workspace hands out a [`GenerationTicket`] and later accepts the result
//! through [`Workspace::finish_generation`].

use crate::constants::DEFAULT_AUTHOR;
use crate::error::ReplyError;
use crate::types::{CommentData, CommentStatus, Sentiment, UserProfile};

/// Which comment the reply workspace is working on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// The unsaved draft built from the input fields
    #[default]
    New,
    Comment(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InboxTab {
    #[default]
    Pending,
    Replied,
}

impl InboxTab {
    pub fn toggle(self) -> Self {
        match self {
            Self::Pending => Self::Replied,
            Self::Replied => Self::Pending,
        }
    }

    fn status(self) -> CommentStatus {
        match self {
            Self::Pending => CommentStatus::Pending,
            Self::Replied => CommentStatus::Replied,
        }
    }
}

/// Input fields for the "new" draft
#[derive(Debug, Clone, Default)]
pub struct DraftInput {
    pub author: String,
    pub text: String,
    pub video_url: String,
}

impl DraftInput {
    /// Keeps the video URL; replies often target the same video
    fn clear_comment(&mut self) {
        self.author.clear();
        self.text.clear();
    }
}

/// Everything the AI actor needs for one generation request
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub seq: u64,
    pub comment: CommentData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Posted { id: String },
    /// No signed-in user; nothing was changed
    LoginRequired,
    /// No generated reply or no active comment
    NothingToPost,
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    comments: Vec<CommentData>,
    pub selection: Selection,
    pub input: DraftInput,
    /// Generated reply shown in the workspace, not yet posted
    pub reply: Option<String>,
    pub generating: bool,
    pub tab: InboxTab,
    generation_seq: u64,
    in_flight: Option<(u64, Selection)>,
    last_id: i64,
}

impl Workspace {
    #[cfg(test)]
    pub fn comments(&self) -> &[CommentData] {
        &self.comments
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Items of one tab, strictly by status, newest first
    pub fn visible(&self, tab: InboxTab) -> Vec<&CommentData> {
        let status = tab.status();
        self.comments
            .iter()
            .filter(|c| c.status == status)
            .collect()
    }

    pub fn count(&self, tab: InboxTab) -> usize {
        let status = tab.status();
        self.comments.iter().filter(|c| c.status == status).count()
    }

    /// The comment being worked on; "new" is synthesized from the inputs
    pub fn active_comment(&self) -> Option<CommentData> {
        match &self.selection {
            Selection::New => {
                let author = self.input.author.trim();
                let video_url = self.input.video_url.trim();
                Some(CommentData {
                    id: "new".to_string(),
                    author: if author.is_empty() {
                        DEFAULT_AUTHOR.to_string()
                    } else {
                        author.to_string()
                    },
                    text: self.input.text.clone(),
                    timestamp: "Now".to_string(),
                    video_url: (!video_url.is_empty()).then(|| video_url.to_string()),
                    status: CommentStatus::Pending,
                    reply: None,
                    sentiment: Some(Sentiment::Neutral),
                })
            }
            Selection::Comment(id) => self.comments.iter().find(|c| &c.id == id).cloned(),
        }
    }

    /// The shown reply can be edited until it is posted
    pub fn reply_editable(&self) -> bool {
        self.reply.is_some()
            && !self.generating
            && self.active_comment().is_some_and(|c| !c.is_replied())
    }

    pub fn reply_mut(&mut self) -> Option<&mut String> {
        if self.reply_editable() {
            self.reply.as_mut()
        } else {
            None
        }
    }

    pub fn select(&mut self, selection: Selection) {
        self.reply = match &selection {
            Selection::New => None,
            Selection::Comment(id) => self
                .comments
                .iter()
                .find(|c| &c.id == id)
                .and_then(|c| c.reply.clone()),
        };
        self.selection = selection;
        self.invalidate_generation();
    }

    /// Start a first generation for the active comment
    pub fn generate(&mut self) -> Option<GenerationTicket> {
        if self.reply.is_some() {
            return None;
        }
        self.start_generation()
    }

    /// Discard the shown reply and generate a new one
    pub fn regenerate(&mut self) -> Option<GenerationTicket> {
        if self.reply.is_none() {
            return None;
        }
        let ticket = self.start_generation()?;
        self.reply = None;
        Some(ticket)
    }

    fn start_generation(&mut self) -> Option<GenerationTicket> {
        if self.generating {
            return None;
        }
        let comment = self.active_comment()?;
        if comment.is_replied() || comment.text.trim().is_empty() {
            return None;
        }

        self.generation_seq += 1;
        let seq = self.generation_seq;
        self.in_flight = Some((seq, self.selection.clone()));
        self.generating = true;

        Some(GenerationTicket { seq, comment })
    }

    /// Apply a generation result.
    ///
    /// Returns `Ok(false)` when the result is stale and was dropped; errors
    /// are only returned for the current request.
    pub fn finish_generation(
        &mut self,
        seq: u64,
        result: Result<String, ReplyError>,
    ) -> Result<bool, ReplyError> {
        let current = match &self.in_flight {
            Some((latest, target)) => *latest == seq && *target == self.selection,
            None => false,
        };
        if !current {
            tracing::debug!("Dropping stale generation result #{}", seq);
            return Ok(false);
        }

        self.in_flight = None;
        self.generating = false;
        self.reply = Some(result?);
        Ok(true)
    }

    /// Attach the (possibly edited) reply to the active comment and mark it
    /// replied
    pub fn post(&mut self, user: Option<&UserProfile>) -> PostOutcome {
        let reply = self.reply.clone().filter(|r| !r.trim().is_empty());
        let (Some(reply), Some(comment)) = (reply, self.active_comment()) else {
            return PostOutcome::NothingToPost;
        };
        if comment.is_replied() {
            return PostOutcome::NothingToPost;
        }
        let Some(user) = user else {
            return PostOutcome::LoginRequired;
        };

        let id = match &self.selection {
            Selection::New => self.mint_id(),
            Selection::Comment(id) => id.clone(),
        };
        let posted = CommentData {
            id: id.clone(),
            reply: Some(reply),
            status: CommentStatus::Replied,
            timestamp: display_timestamp(),
            ..comment
        };

        match self.selection {
            Selection::New => self.comments.insert(0, posted),
            Selection::Comment(_) => {
                if let Some(slot) = self.comments.iter_mut().find(|c| c.id == id) {
                    *slot = posted;
                }
            }
        }
        tracing::info!("Reply posted as {} for comment {}", user.email, id);

        self.input.clear_comment();
        self.select(Selection::New);
        self.tab = InboxTab::Replied;
        PostOutcome::Posted { id }
    }

    /// Keep the "new" draft as a pending item to reply to later
    pub fn save_draft(&mut self) -> Option<String> {
        if self.selection != Selection::New {
            return None;
        }
        let comment = self.active_comment()?;
        if comment.text.trim().is_empty() {
            return None;
        }

        let id = self.mint_id();
        self.comments.insert(
            0,
            CommentData {
                id: id.clone(),
                timestamp: display_timestamp(),
                ..comment
            },
        );
        self.input.clear_comment();
        self.select(Selection::New);
        self.tab = InboxTab::Pending;
        Some(id)
    }

    /// Empty the session; the caller is responsible for confirmation
    pub fn clear(&mut self) {
        self.comments.clear();
        self.select(Selection::New);
    }

    fn invalidate_generation(&mut self) {
        self.in_flight = None;
        self.generating = false;
    }

    /// Millisecond timestamp, strictly increasing within the session
    fn mint_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }
}

fn display_timestamp() -> String {
    chrono::Local::now().format("%b %-d, %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sam() -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            avatar_url: String::new(),
        }
    }

    fn with_draft(text: &str) -> Workspace {
        let mut ws = Workspace::default();
        ws.input.text = text.to_string();
        ws
    }

    /// Generate and complete a reply for the active comment
    fn generated(ws: &mut Workspace, reply: &str) {
        let ticket = ws.generate().unwrap();
        assert!(ws.finish_generation(ticket.seq, Ok(reply.to_string())).unwrap());
    }

    #[test]
    fn test_new_draft_defaults() {
        let ws = with_draft("Great video!");
        let comment = ws.active_comment().unwrap();
        assert_eq!(comment.id, "new");
        assert_eq!(comment.author, "Viewer");
        assert_eq!(comment.timestamp, "Now");
        assert_eq!(comment.status, CommentStatus::Pending);
        assert_eq!(comment.sentiment, Some(Sentiment::Neutral));
        assert_eq!(comment.video_url, None);
    }

    #[test]
    fn test_generate_requires_text() {
        let mut ws = with_draft("   ");
        assert!(ws.generate().is_none());
        assert!(!ws.generating);
    }

    #[test]
    fn test_generate_refuses_duplicate_while_in_flight() {
        let mut ws = with_draft("hello");
        let ticket = ws.generate().unwrap();
        assert!(ws.generating);
        assert_eq!(ticket.comment.text, "hello");
        assert!(ws.generate().is_none());
    }

    #[test]
    fn test_failed_generation_clears_flag() {
        let mut ws = with_draft("hello");
        let ticket = ws.generate().unwrap();
        let err = ws
            .finish_generation(ticket.seq, Err(ReplyError::generation_failed()))
            .unwrap_err();
        assert!(matches!(err, ReplyError::Generation(_)));
        assert!(!ws.generating);
        assert!(ws.reply.is_none());
    }

    #[test]
    fn test_regenerate_discards_previous_reply() {
        let mut ws = with_draft("hello");
        assert!(ws.regenerate().is_none());
        generated(&mut ws, "first");
        assert!(ws.generate().is_none());

        let ticket = ws.regenerate().unwrap();
        assert!(ws.reply.is_none());
        ws.finish_generation(ticket.seq, Ok("second".to_string()))
            .unwrap();
        assert_eq!(ws.reply.as_deref(), Some("second"));
    }

    #[test]
    fn test_stale_result_after_selection_change_is_dropped() {
        let mut ws = with_draft("first comment");
        ws.save_draft().unwrap();
        let id = ws.comments()[0].id.clone();

        ws.input.text = "second comment".to_string();
        let ticket = ws.generate().unwrap();
        ws.select(Selection::Comment(id));
        assert!(!ws.generating);

        let applied = ws
            .finish_generation(ticket.seq, Ok("late".to_string()))
            .unwrap();
        assert!(!applied);
        assert!(ws.reply.is_none());
    }

    #[test]
    fn test_stale_error_is_dropped_silently() {
        let mut ws = with_draft("hello");
        let ticket = ws.generate().unwrap();
        ws.select(Selection::New);
        assert_eq!(
            ws.finish_generation(ticket.seq, Err(ReplyError::generation_failed())),
            Ok(false)
        );
    }

    #[test]
    fn test_post_without_user_requires_login() {
        let mut ws = with_draft("Great video!");
        generated(&mut ws, "Thanks!");

        assert_eq!(ws.post(None), PostOutcome::LoginRequired);
        assert!(ws.is_empty());
        assert_eq!(ws.reply.as_deref(), Some("Thanks!"));
        assert_eq!(ws.input.text, "Great video!");
    }

    #[test]
    fn test_post_new_prepends_and_resets_inputs() {
        let mut ws = with_draft("Great video!");
        ws.input.author = "Sam".to_string();
        ws.input.video_url = "https://youtu.be/abc".to_string();
        generated(&mut ws, "Thanks Sam!");

        let PostOutcome::Posted { id } = ws.post(Some(&sam())) else {
            panic!("expected post");
        };

        assert_eq!(ws.comments().len(), 1);
        let posted = &ws.comments()[0];
        assert_eq!(posted.id, id);
        assert_ne!(posted.id, "new");
        assert_eq!(posted.author, "Sam");
        assert_eq!(posted.reply.as_deref(), Some("Thanks Sam!"));
        assert_eq!(posted.status, CommentStatus::Replied);
        assert_eq!(posted.video_url.as_deref(), Some("https://youtu.be/abc"));

        assert_eq!(ws.selection, Selection::New);
        assert!(ws.reply.is_none());
        assert!(ws.input.author.is_empty());
        assert!(ws.input.text.is_empty());
        assert_eq!(ws.input.video_url, "https://youtu.be/abc");
        assert_eq!(ws.tab, InboxTab::Replied);
    }

    #[test]
    fn test_post_pending_item_replaces_in_place() {
        let mut ws = with_draft("older");
        ws.save_draft().unwrap();
        ws.input.text = "newer".to_string();
        let newer = ws.save_draft().unwrap();
        assert_eq!(ws.count(InboxTab::Pending), 2);

        ws.select(Selection::Comment(newer.clone()));
        generated(&mut ws, "reply");
        assert_eq!(ws.post(Some(&sam())), PostOutcome::Posted { id: newer.clone() });

        assert_eq!(ws.comments().len(), 2);
        assert_eq!(ws.comments()[0].id, newer);
        assert!(ws.comments()[0].is_replied());
        assert_eq!(ws.count(InboxTab::Pending), 1);
        assert_eq!(ws.selection, Selection::New);
    }

    #[test]
    fn test_replied_item_cannot_be_regenerated_or_reposted() {
        let mut ws = with_draft("hello");
        generated(&mut ws, "hi");
        let PostOutcome::Posted { id } = ws.post(Some(&sam())) else {
            panic!("expected post");
        };

        ws.select(Selection::Comment(id));
        assert_eq!(ws.reply.as_deref(), Some("hi"));
        assert!(ws.generate().is_none());
        assert!(ws.regenerate().is_none());
        assert_eq!(ws.post(Some(&sam())), PostOutcome::NothingToPost);
    }

    #[test]
    fn test_post_without_reply_does_nothing() {
        let mut ws = with_draft("hello");
        assert_eq!(ws.post(Some(&sam())), PostOutcome::NothingToPost);
        assert!(ws.is_empty());
    }

    #[test]
    fn test_views_are_disjoint_and_complete() {
        let mut ws = with_draft("one");
        ws.save_draft().unwrap();
        ws.input.text = "two".to_string();
        generated(&mut ws, "reply two");
        ws.post(Some(&sam()));
        ws.input.text = "three".to_string();
        ws.save_draft().unwrap();

        let pending = ws.visible(InboxTab::Pending);
        let replied = ws.visible(InboxTab::Replied);
        assert_eq!(pending.len() + replied.len(), ws.comments().len());
        assert!(pending.iter().all(|c| !c.is_replied()));
        assert!(replied.iter().all(|c| c.is_replied()));
        assert!(pending.iter().all(|p| replied.iter().all(|r| r.id != p.id)));
        assert!(ws.comments().iter().all(|c| c.id != "new"));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut ws = Workspace::default();
        let a: i64 = ws.mint_id().parse().unwrap();
        let b: i64 = ws.mint_id().parse().unwrap();
        let c: i64 = ws.mint_id().parse().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_save_draft_only_from_new() {
        let mut ws = with_draft("hello");
        ws.input.video_url = "v".to_string();
        let id = ws.save_draft().unwrap();
        assert_eq!(ws.tab, InboxTab::Pending);
        assert!(ws.input.text.is_empty());
        assert_eq!(ws.input.video_url, "v");

        ws.select(Selection::Comment(id));
        assert!(ws.save_draft().is_none());
        assert!(with_draft("").save_draft().is_none());
    }

    #[test]
    fn test_clear_empties_session() {
        let mut ws = with_draft("hello");
        ws.save_draft().unwrap();
        ws.input.text = "more".to_string();
        ws.generate().unwrap();

        ws.clear();
        assert!(ws.is_empty());
        assert!(ws.reply.is_none());
        assert!(!ws.generating);
        assert_eq!(ws.selection, Selection::New);
    }

    #[test]
    fn test_edited_reply_is_what_gets_posted() {
        let mut ws = with_draft("Great video!");
        generated(&mut ws, "Thanks");
        ws.reply_mut().unwrap().push_str(" so much!");

        ws.post(Some(&sam()));
        assert_eq!(ws.comments()[0].reply.as_deref(), Some("Thanks so much!"));
    }

    #[test]
    fn test_reply_editable_only_while_pending() {
        let mut ws = with_draft("hello");
        assert!(ws.reply_mut().is_none());
        generated(&mut ws, "hi");
        assert!(ws.reply_editable());

        ws.reply_mut().unwrap().clear();
        assert_eq!(ws.post(Some(&sam())), PostOutcome::NothingToPost);

        ws.reply = Some("hi".to_string());
        let PostOutcome::Posted { id } = ws.post(Some(&sam())) else {
            panic!("expected post");
        };
        ws.select(Selection::Comment(id));
        assert_eq!(ws.reply.as_deref(), Some("hi"));
        assert!(!ws.reply_editable());
        assert!(ws.reply_mut().is_none());
    }
}
