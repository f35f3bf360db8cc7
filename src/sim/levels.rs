//! Level catalog
//!
//! Each level is one work week. Layouts are laid out on a day × timeslot
//! grid when the catalog is built, with a per-week chance of leaving a slot
//! free, so every run gets a different calendar.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Dimensions, MeetingBlock, MeetingType};
use crate::consts::DAYS_PER_WEEK;

/// Horizontal padding inside each day column
const DAY_PADDING: f32 = 10.0;

/// A playable level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub id: u32,
    pub name: String,
    /// Calendar label shown with the level
    pub week_of: String,
    /// Seed layout, copied into play when the level loads
    pub meetings: Vec<MeetingBlock>,
    /// Chance a cancelled meeting drops a power-up
    pub power_up_chance: f64,
    /// Base ball speed (pixels/tick)
    pub ball_speed: f32,
}

/// How a week colors its meetings
#[derive(Debug, Clone, Copy)]
enum ColorPick {
    ByColumn,
    Random,
}

/// Recipe for one week's layout
struct WeekBlueprint {
    name: &'static str,
    week_of: &'static str,
    rows: usize,
    top: f32,
    row_pitch: f32,
    block_height: f32,
    /// Chance a slot is left empty
    omission_chance: f64,
    power_up_chance: f64,
    ball_speed: f32,
    palette: &'static [u32],
    color_pick: ColorPick,
    titles: &'static [&'static str],
    /// Meeting type and toughness for a row
    row_meeting: fn(usize) -> (MeetingType, u32),
}

const PALETTE: &[u32] = &[0x3b82f6, 0xf59e0b, 0x10b981, 0x8b5cf6, 0xef4444];
const PALETTE_WIDE: &[u32] = &[0x3b82f6, 0xf59e0b, 0x10b981, 0x8b5cf6, 0xef4444, 0x06b6d4];

fn week_one_rows(_row: usize) -> (MeetingType, u32) {
    (MeetingType::Standup, 1)
}

fn week_two_rows(row: usize) -> (MeetingType, u32) {
    match row {
        3 => (MeetingType::AllHands, 3),
        2 => (MeetingType::TeamMeeting, 2),
        _ => (MeetingType::TeamMeeting, 1),
    }
}

fn week_three_rows(row: usize) -> (MeetingType, u32) {
    match row {
        4 => (MeetingType::AllHands, 4),
        3 => (MeetingType::Planning, 3),
        _ => (MeetingType::TeamMeeting, 2),
    }
}

const WEEKS: [WeekBlueprint; 3] = [
    WeekBlueprint {
        name: "Week 1: New Job",
        week_of: "January 11-17, 2025",
        rows: 3,
        top: 100.0,
        row_pitch: 60.0,
        block_height: 45.0,
        omission_chance: 0.3,
        power_up_chance: 0.15,
        ball_speed: 6.0,
        palette: PALETTE,
        color_pick: ColorPick::ByColumn,
        titles: &[
            "standup",
            "sync",
            "1:1 / alice",
            "review",
            "planning",
            "demo",
            "interview",
            "training",
            "all-hands",
            "retrospective",
        ],
        row_meeting: week_one_rows,
    },
    WeekBlueprint {
        name: "Week 2: Ramping Up",
        week_of: "January 18-24, 2025",
        rows: 4,
        top: 100.0,
        row_pitch: 55.0,
        block_height: 45.0,
        omission_chance: 0.2,
        power_up_chance: 0.12,
        ball_speed: 7.0,
        palette: PALETTE,
        color_pick: ColorPick::Random,
        titles: &[
            "standup",
            "stakeholder",
            "1:1 / bob",
            "promote",
            "discuss",
            "team lunch",
            "hiring",
            "sitdown",
            "planning",
            "review",
        ],
        row_meeting: week_two_rows,
    },
    WeekBlueprint {
        name: "Week 3: Peak Performance",
        week_of: "January 25-31, 2025",
        rows: 5,
        top: 90.0,
        row_pitch: 50.0,
        block_height: 40.0,
        omission_chance: 0.0,
        power_up_chance: 0.1,
        ball_speed: 8.0,
        palette: PALETTE_WIDE,
        color_pick: ColorPick::Random,
        titles: &[
            "board meeting",
            "investor call",
            "quarterly review",
            "team offsite",
            "performance review",
            "strategy session",
            "client presentation",
            "training",
        ],
        row_meeting: week_three_rows,
    },
];

impl WeekBlueprint {
    fn build(&self, id: u32, canvas_width: f32, rng: &mut impl Rng) -> Level {
        let day_width = canvas_width / DAYS_PER_WEEK as f32;
        let mut meetings = Vec::with_capacity(self.rows * DAYS_PER_WEEK);

        for row in 0..self.rows {
            for col in 0..DAYS_PER_WEEK {
                if rng.random_bool(self.omission_chance) {
                    continue;
                }

                let (kind, max_hits) = (self.row_meeting)(row);
                let color = match self.color_pick {
                    ColorPick::ByColumn => self.palette[col % self.palette.len()],
                    ColorPick::Random => self.palette[rng.random_range(0..self.palette.len())],
                };
                let title = self.titles[rng.random_range(0..self.titles.len())];

                meetings.push(MeetingBlock {
                    id: (row * DAYS_PER_WEEK + col) as u32 + 1,
                    pos: Vec2::new(
                        col as f32 * day_width + DAY_PADDING,
                        self.top + row as f32 * self.row_pitch,
                    ),
                    size: Dimensions::new(day_width - 2.0 * DAY_PADDING, self.block_height),
                    kind,
                    hits: 0,
                    max_hits,
                    color,
                    title: title.to_string(),
                });
            }
        }

        Level {
            id,
            name: self.name.to_string(),
            week_of: self.week_of.to_string(),
            meetings,
            power_up_chance: self.power_up_chance,
            ball_speed: self.ball_speed,
        }
    }
}

/// Immutable, ordered catalog of levels
#[derive(Debug, Clone)]
pub struct LevelManager {
    levels: Vec<Level>,
}

impl LevelManager {
    /// Lay out every week for a field `canvas_width` pixels wide
    pub fn new(canvas_width: f32, rng: &mut impl Rng) -> Self {
        let levels = WEEKS
            .iter()
            .enumerate()
            .map(|(i, week)| week.build(i as u32 + 1, canvas_width, &mut *rng))
            .collect::<Vec<_>>();

        for level in &levels {
            log::debug!(
                "Level {} '{}': {} meetings, speed {}",
                level.id,
                level.name,
                level.meetings.len(),
                level.ball_speed
            );
        }

        Self { levels }
    }

    /// Look up a level by its 1-based id. `None` means the run is over.
    pub fn level(&self, id: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }

    /// The opening level
    pub fn first(&self) -> &Level {
        &self.levels[0]
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}
