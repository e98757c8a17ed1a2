//! Message formatting utilities for client display.

use chrono::{DateTime, Utc};

/// Message formatter for client display
pub struct MessageFormatter;

fn room_suffix(room: Option<&str>) -> String {
    room.map(|r| format!(" [#{}]", r)).unwrap_or_default()
}

impl MessageFormatter {
    /// Render an ISO 8601 timestamp as `HH:MM:SS` (UTC); unparsable input is shown as-is.
    pub fn format_time(timestamp: &str) -> String {
        DateTime::parse_from_rfc3339(timestamp)
            .map(|dt| dt.with_timezone(&Utc).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| timestamp.to_string())
    }

    pub fn format_member_joined(room: Option<&str>, username: &str) -> String {
        format!("\n+ {} joined{}\n", username, room_suffix(room))
    }

    pub fn format_member_left(room: Option<&str>, username: &str) -> String {
        format!("\n- {} left{}\n", username, room_suffix(room))
    }

    /// Format the member list, marking the current user with "(me)"
    pub fn format_roster(room: Option<&str>, users: &[String], me: &str) -> String {
        let mut output = String::new();
        output.push_str("\n============================================================\n");
        output.push_str(&format!("Members{}:\n", room_suffix(room)));

        if users.is_empty() {
            output.push_str("(No members)\n");
        } else {
            for user in users {
                let me_suffix = if user == me { " (me)" } else { "" };
                output.push_str(&format!("{}{}\n", user, me_suffix));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format a chat message
    ///
    /// `delivered` marks the echo of a message this client sent.
    pub fn format_chat_message(
        room: Option<&str>,
        sender: &str,
        content: &str,
        timestamp: &str,
        delivered: bool,
    ) -> String {
        let delivered_mark = if delivered { " ✓" } else { "" };
        format!(
            "\n[{}]{} @{}: {}{}\n",
            Self::format_time(timestamp),
            room_suffix(room),
            sender,
            content,
            delivered_mark
        )
    }

    pub fn format_joined_room(room: &str) -> String {
        format!("\nJoined #{}\n", room)
    }

    /// Format the `/rooms` listing
    pub fn format_rooms(joined: &[String], active: Option<&str>) -> String {
        if joined.is_empty() {
            return "\n(No rooms joined)\n".to_string();
        }
        let mut output = String::from("\nRooms:\n");
        for room in joined {
            let marker = if Some(room.as_str()) == active { "*" } else { " " };
            output.push_str(&format!("{} #{}\n", marker, room));
        }
        output
    }

    pub fn format_notice(text: &str) -> String {
        format!("\n! {}\n", text)
    }

    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
