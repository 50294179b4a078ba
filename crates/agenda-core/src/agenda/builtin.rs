//! The built-in three-day conference programme.

use chrono::NaiveDate;

use super::{Agenda, AgendaItem, DaySchedule, SessionKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn session(
    time: &str,
    title: &str,
    duration_min: u32,
    speaker: &str,
    kind: SessionKind,
) -> AgendaItem {
    AgendaItem::new(time, title, duration_min)
        .with_speaker(speaker)
        .with_kind(kind)
}

impl Agenda {
    /// Inauguration afternoon followed by two full conference days.
    pub fn default_conference() -> Self {
        Self::new(vec![
            DaySchedule::new(
                "Inauguration",
                date(2025, 9, 18),
                vec![
                    session(
                        "12:00",
                        "Arrival of the Chief Guest & the Guest of Honour",
                        20,
                        "Conference Organizers",
                        SessionKind::Ceremony,
                    )
                    .with_description(
                        "Guests arrive for the inauguration ceremony. Please take your seats.",
                    ),
                    session(
                        "12:20",
                        "Welcome Address",
                        10,
                        "Society President",
                        SessionKind::Address,
                    )
                    .with_description("Opening remarks and welcome to all participants."),
                    session(
                        "12:30",
                        "National ICT Awards - Session 1",
                        15,
                        "Awards Committee",
                        SessionKind::Awards,
                    ),
                    session(
                        "12:45",
                        "Address by the Chief Guest",
                        10,
                        "Chief Guest",
                        SessionKind::Keynote,
                    ),
                    session(
                        "12:55",
                        "Address by the Guest of Honour",
                        15,
                        "Guest of Honour",
                        SessionKind::Keynote,
                    ),
                    session(
                        "13:10",
                        "Keynote: Payments and the Digital Economy",
                        20,
                        "Industry Keynote Speaker",
                        SessionKind::Keynote,
                    ),
                    session(
                        "13:30",
                        "National ICT Awards - Session 2",
                        15,
                        "Awards Committee",
                        SessionKind::Awards,
                    ),
                    session(
                        "13:45",
                        "Keynote: Building Software Exports",
                        10,
                        "Industry Keynote Speaker",
                        SessionKind::Keynote,
                    ),
                    session(
                        "13:55",
                        "Keynote: Technology and Finance",
                        20,
                        "Industry Keynote Speaker",
                        SessionKind::Keynote,
                    ),
                    session(
                        "14:15",
                        "Recognition of Sponsors",
                        20,
                        "Conference Organizers",
                        SessionKind::Ceremony,
                    ),
                    session(
                        "14:35",
                        "Vote of Thanks",
                        15,
                        "Conference Chair",
                        SessionKind::Closing,
                    ),
                    session(
                        "14:50",
                        "Inauguration Conclusion",
                        0,
                        "Conference Team",
                        SessionKind::Conclusion,
                    )
                    .with_description("End of the inauguration ceremony. See you tomorrow."),
                ],
            ),
            DaySchedule::new(
                "Day 1",
                date(2025, 9, 19),
                vec![
                    session(
                        "08:15",
                        "Registration & Welcome",
                        45,
                        "Conference Team",
                        SessionKind::Registration,
                    )
                    .with_description("Check-in, conference kits and name tags."),
                    session(
                        "09:00",
                        "Guest Speech",
                        20,
                        "Guest Speaker",
                        SessionKind::Keynote,
                    ),
                    session(
                        "09:20",
                        "Keynote 1: Future of Technology",
                        25,
                        "Technology Expert",
                        SessionKind::Keynote,
                    ),
                    session(
                        "09:45",
                        "Panel Discussion 1: E-Government 5.0",
                        60,
                        "Government Technology Panel",
                        SessionKind::Panel,
                    ),
                    session(
                        "10:45",
                        "Morning Tea & Networking",
                        35,
                        "All Participants",
                        SessionKind::Break,
                    ),
                    session(
                        "11:20",
                        "Keynote 2: Digital Innovation Strategies",
                        25,
                        "Innovation Strategist",
                        SessionKind::Keynote,
                    ),
                ],
            ),
            DaySchedule::new(
                "Day 2",
                date(2025, 9, 20),
                vec![
                    session(
                        "08:30",
                        "Day 2 Registration",
                        30,
                        "Conference Team",
                        SessionKind::Registration,
                    ),
                    session(
                        "09:00",
                        "Guest Speech: National Digital Economy",
                        20,
                        "Digital Economy Advisor",
                        SessionKind::Keynote,
                    ),
                ],
            ),
        ])
    }
}
