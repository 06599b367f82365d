//! Snapshot list and move records for navigating a game.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Piece, PieceKind, Position, Square};

/// One completed move as shown in a move list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece that moved, before promotion
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<Piece>,
    /// SAN label, e.g. "Nf3" or "exd8=Q+"
    pub label: String,
}

/// Linear list of positions with a cursor.
///
/// `records[i]` is the move leading from `snapshots[i]` to
/// `snapshots[i + 1]`, so there is always exactly one more snapshot than
/// there are records.
#[derive(Clone, Debug)]
pub(crate) struct History {
    snapshots: Vec<Position>,
    records: Vec<MoveRecord>,
    cursor: usize,
}

impl History {
    pub(crate) fn new(start: Position) -> Self {
        History {
            snapshots: vec![start],
            records: Vec::new(),
            cursor: 0,
        }
    }

    /// Append a move made from the snapshot under the cursor.
    ///
    /// Anything after the cursor is discarded first.
    pub(crate) fn push(&mut self, position: Position, record: MoveRecord) {
        if self.cursor + 1 < self.snapshots.len() {
            log::debug!(
                "discarding {} snapshots after index {}",
                self.snapshots.len() - self.cursor - 1,
                self.cursor
            );
        }
        self.snapshots.truncate(self.cursor + 1);
        self.records.truncate(self.cursor);
        self.snapshots.push(position);
        self.records.push(record);
        self.cursor = self.snapshots.len() - 1;
    }

    /// Move the cursor, returning the snapshot now under it.
    pub(crate) fn restore(&mut self, index: usize) -> Option<&Position> {
        let snapshot = self.snapshots.get(index)?;
        self.cursor = index;
        Some(snapshot)
    }

    pub(crate) fn current(&self) -> &Position {
        &self.snapshots[self.cursor]
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Every record, including those past the cursor
    pub(crate) fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Records of the moves that led to the snapshot under the cursor
    pub(crate) fn records_to_cursor(&self) -> &[MoveRecord] {
        &self.records[..self.cursor]
    }
}
