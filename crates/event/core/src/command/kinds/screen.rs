//! Cutscene-only screen commands.

use serde::{Deserialize, Serialize};

use super::{continue_countdown, countdown};
use crate::command::{CommandKind, CommandResult, EventCommand, Progress, ResumeToken};
use crate::context::{ExecutionContext, FadeDirection, ScreenEffect};

/// Fades the screen in or out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeScreen {
    pub direction: FadeDirection,
    pub duration_ticks: u32,
    /// Hold the program until the fade finished.
    pub wait: bool,
}

impl FadeScreen {
    pub fn new(direction: FadeDirection, duration_ticks: u32) -> Self {
        Self {
            direction,
            duration_ticks,
            wait: true,
        }
    }
}

impl EventCommand for FadeScreen {
    fn kind(&self) -> CommandKind {
        CommandKind::FadeScreen
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        ctx.host.screen_effect(&ScreenEffect::Fade {
            direction: self.direction,
            duration_ticks: self.duration_ticks,
        });
        Ok(if self.wait {
            countdown(self.duration_ticks)
        } else {
            Progress::Completed
        })
    }

    fn resume(&mut self, token: ResumeToken, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(continue_countdown(token))
    }
}

/// Shakes the screen.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShakeScreen {
    pub power: u8,
    pub speed: u8,
    pub duration_ticks: u32,
    pub wait: bool,
}

impl ShakeScreen {
    pub fn new(power: u8, speed: u8, duration_ticks: u32) -> Self {
        Self {
            power,
            speed,
            duration_ticks,
            wait: false,
        }
    }
}

impl EventCommand for ShakeScreen {
    fn kind(&self) -> CommandKind {
        CommandKind::ShakeScreen
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        ctx.host.screen_effect(&ScreenEffect::Shake {
            power: self.power,
            speed: self.speed,
            duration_ticks: self.duration_ticks,
        });
        Ok(if self.wait {
            countdown(self.duration_ticks)
        } else {
            Progress::Completed
        })
    }

    fn resume(&mut self, token: ResumeToken, _ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        Ok(continue_countdown(token))
    }
}
