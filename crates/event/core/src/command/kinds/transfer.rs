//! Transfer Player command.

use serde::{Deserialize, Serialize};

use crate::command::{CommandKind, CommandResult, EventCommand, Progress};
use crate::context::{ExecutionContext, TransferRequest};

/// Moves the player to another map location.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPlayer {
    pub map_id: u32,
    pub x: i32,
    pub y: i32,
    pub fade: bool,
}

impl TransferPlayer {
    pub fn new(map_id: u32, x: i32, y: i32) -> Self {
        Self {
            map_id,
            x,
            y,
            fade: true,
        }
    }
}

impl EventCommand for TransferPlayer {
    fn kind(&self) -> CommandKind {
        CommandKind::TransferPlayer
    }

    fn execute(&mut self, ctx: &ExecutionContext<'_>) -> CommandResult<Progress> {
        ctx.host.transfer_player(&TransferRequest {
            owner: ctx.owner,
            map_id: self.map_id,
            x: self.x,
            y: self.y,
            fade: self.fade,
        });
        Ok(Progress::Completed)
    }
}
