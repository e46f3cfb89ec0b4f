//! Message templates for meeting notifications.
//!
//! Each notification renders to an email (subject plus HTML body) and a
//! short plain-text body for chat channels.

use crate::domain::meeting::{RecurringMeeting, UserRef};
use crate::ports::NotificationKind;

/// A notification rendered for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Renders notifications with links back to the web frontend.
#[derive(Debug, Clone)]
pub struct MessageTemplates {
    frontend_url: String,
    sender_name: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::new("http://localhost:5173", "Meeting Scheduler")
    }
}

impl MessageTemplates {
    pub fn new(frontend_url: impl Into<String>, sender_name: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
            sender_name: sender_name.into(),
        }
    }

    /// Link to the meeting's detail page.
    pub fn meeting_link(&self, meeting: &RecurringMeeting) -> String {
        format!("{}/meetings/{}", self.frontend_url, meeting.id)
    }

    pub fn render(
        &self,
        kind: NotificationKind,
        user: &UserRef,
        meeting: &RecurringMeeting,
    ) -> RenderedMessage {
        match kind {
            NotificationKind::Reminder => self.reminder(user, meeting),
            NotificationKind::CheckIn => self.check_in(user, meeting),
            NotificationKind::MeetingCreated => self.meeting_created(user, meeting),
        }
    }

    fn reminder(&self, user: &UserRef, meeting: &RecurringMeeting) -> RenderedMessage {
        let details = self.detail_rows(meeting, false);
        RenderedMessage {
            subject: format!(
                "Meeting Reminder: {} with {}",
                meeting.title, meeting.stakeholder.name
            ),
            html: self.wrap_html(
                "Meeting Reminder",
                user,
                "This is a reminder about your upcoming meeting:",
                &details,
                "<p>Please make sure you are prepared. You can view the meeting and update \
                 its status in the meeting scheduler.</p>",
            ),
            text: self.wrap_text(
                "Meeting Reminder",
                meeting,
                false,
                "Don't forget to prepare and review your meeting details.",
            ),
        }
    }

    fn check_in(&self, user: &UserRef, meeting: &RecurringMeeting) -> RenderedMessage {
        let details = self.detail_rows(meeting, false);
        RenderedMessage {
            subject: format!(
                "Meeting Check-in: {} with {}",
                meeting.title, meeting.stakeholder.name
            ),
            html: self.wrap_html(
                "Meeting Check-in",
                user,
                "We're checking in about your scheduled meeting:",
                &details,
                "<p>Did this meeting take place? Please either:</p>\
                 <ul><li>record the minutes of the meeting if it happened</li>\
                 <li>give a reason if it did not</li></ul>",
            ),
            text: self.wrap_text(
                "Meeting Check-in Required",
                meeting,
                false,
                "Please update the status of this meeting.",
            ),
        }
    }

    fn meeting_created(&self, user: &UserRef, meeting: &RecurringMeeting) -> RenderedMessage {
        let mut details = self.detail_rows(meeting, true);
        if let Some(notes) = &meeting.notes {
            details.push_str(&format!(
                "<p><strong>Notes:</strong> {}</p>",
                escape_html(notes)
            ));
        }
        RenderedMessage {
            subject: format!(
                "New Meeting Scheduled: {} with {}",
                meeting.title, meeting.stakeholder.name
            ),
            html: self.wrap_html(
                "New Meeting Scheduled",
                user,
                "A new meeting has been scheduled for you:",
                &details,
                "<p>You can view the meeting details in the meeting scheduler.</p>",
            ),
            text: self.wrap_text(
                "New Meeting Scheduled",
                meeting,
                true,
                "Please log in for more details.",
            ),
        }
    }

    fn detail_rows(&self, meeting: &RecurringMeeting, full: bool) -> String {
        let stakeholder = if full {
            meeting.stakeholder.label()
        } else {
            meeting.stakeholder.name.clone()
        };
        let mut rows = format!(
            "<p><strong>Title:</strong> {}</p>\
             <p><strong>Stakeholder:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>",
            escape_html(&meeting.title),
            escape_html(&stakeholder),
            format_date(meeting),
        );
        if full {
            rows.push_str(&format!(
                "<p><strong>Frequency:</strong> {}</p>",
                meeting.frequency
            ));
        }
        rows.push_str(&format!(
            "<p><a href=\"{}\">View meeting details</a></p>",
            self.meeting_link(meeting)
        ));
        rows
    }

    fn wrap_html(
        &self,
        heading: &str,
        user: &UserRef,
        intro: &str,
        details: &str,
        closing: &str,
    ) -> String {
        format!(
            "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;\">\
             <h2>{heading}</h2>\
             <p>Hello {name},</p>\
             <p>{intro}</p>\
             <div style=\"background-color: #f9f9f9; padding: 15px; border-radius: 5px;\">{details}</div>\
             {closing}\
             <p>Thanks,<br>{sender}</p>\
             </div>",
            heading = heading,
            name = escape_html(user.display_name()),
            intro = intro,
            details = details,
            closing = closing,
            sender = escape_html(&self.sender_name),
        )
    }

    fn wrap_text(
        &self,
        heading: &str,
        meeting: &RecurringMeeting,
        full: bool,
        closing: &str,
    ) -> String {
        let stakeholder = if full {
            meeting.stakeholder.label()
        } else {
            meeting.stakeholder.name.clone()
        };
        let mut text = format!(
            "{}\n\nMeeting: {}\nStakeholder: {}\nDate: {}\n",
            heading,
            meeting.title,
            stakeholder,
            format_date(meeting)
        );
        if full {
            text.push_str(&format!("Frequency: {}\n", meeting.frequency));
        }
        text.push_str(&format!(
            "\n{}\n{}\n\n{}",
            closing,
            self.meeting_link(meeting),
            self.sender_name
        ));
        text
    }
}

fn format_date(meeting: &RecurringMeeting) -> String {
    meeting.anchor_date.format("%A, %B %-d, %Y").to_string()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
