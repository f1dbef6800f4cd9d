//! Transport belt segments and belt groups

use serde::{Deserialize, Serialize};

use crate::geometry::{Direction, Position};

/// A single belt tile with its ports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportBelt {
    pub position: Position,
    pub direction: Direction,
    /// Tile the belt takes items from
    pub input_position: Position,
    /// Tile the belt hands items to
    pub output_position: Position,
}

impl TransportBelt {
    /// Belt with ports one tile behind and ahead of its facing
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
            input_position: position.step(direction.opposite()),
            output_position: position.step(direction),
        }
    }

    /// Whether this belt feeds directly into `other`
    pub fn feeds(&self, other: &TransportBelt) -> bool {
        self.output_position.approx_eq(&other.position)
    }
}

/// A contiguous run of belts treated as one logical conveyor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BeltGroup {
    /// Segments in run order
    pub belts: Vec<TransportBelt>,
    /// Segments that accept items from outside the group
    #[serde(default)]
    pub inputs: Vec<TransportBelt>,
    /// Segments that emit items out of the group
    #[serde(default)]
    pub outputs: Vec<TransportBelt>,
}

impl BeltGroup {
    /// Group with an explicit input/output classification
    pub fn new(
        belts: Vec<TransportBelt>,
        inputs: Vec<TransportBelt>,
        outputs: Vec<TransportBelt>,
    ) -> Self {
        Self {
            belts,
            inputs,
            outputs,
        }
    }

    /// Group whose inputs and outputs are derived from belt adjacency
    ///
    /// A belt is an input when no other belt of the run feeds it, and an
    /// output when it feeds no other belt of the run.
    pub fn from_belts(belts: Vec<TransportBelt>) -> Self {
        let inputs = belts
            .iter()
            .enumerate()
            .filter(|(i, belt)| {
                !belts
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != *i && other.feeds(belt))
            })
            .map(|(_, belt)| *belt)
            .collect();

        let outputs = belts
            .iter()
            .enumerate()
            .filter(|(i, belt)| {
                !belts
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != *i && belt.feeds(other))
            })
            .map(|(_, belt)| *belt)
            .collect();

        Self::new(belts, inputs, outputs)
    }

    /// Representative position: the first segment, or the origin when empty
    pub fn position(&self) -> Position {
        self.belts.first().map(|b| b.position).unwrap_or_default()
    }

    /// First input segment, falling back to the first segment
    pub fn first_input(&self) -> Option<&TransportBelt> {
        self.inputs.first().or_else(|| self.belts.first())
    }

    /// Last output segment, falling back to the last segment
    pub fn last_output(&self) -> Option<&TransportBelt> {
        self.outputs.last().or_else(|| self.belts.last())
    }

    pub fn len(&self) -> usize {
        self.belts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.belts.is_empty()
    }
}
