use crate::core::types::{FloorNo, Material, Unit, UnitId};
use std::sync::mpsc::SyncSender;

/// Operation requested from the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Is there enough material for the amount? Never mutates.
    Check,
    /// Take the amount out of stock
    Consume,
    /// Report the remaining stock
    Query,
}

/// A request sent by a unit (or the supervisor) to the inventory service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialRequest {
    pub unit_id: UnitId,
    pub amount: Material,
    pub floor_no: FloorNo,
    pub kind: RequestKind,
}

impl MaterialRequest {
    pub fn check(unit: &Unit, amount: Material) -> Self {
        Self {
            unit_id: unit.unit_id,
            amount,
            floor_no: unit.floor_no,
            kind: RequestKind::Check,
        }
    }

    pub fn consume(unit: &Unit, amount: Material) -> Self {
        Self {
            unit_id: unit.unit_id,
            amount,
            floor_no: unit.floor_no,
            kind: RequestKind::Consume,
        }
    }

    /// Status query on behalf of the site office (unit 0, floor 0)
    pub fn query() -> Self {
        Self {
            unit_id: 0,
            amount: 0,
            floor_no: 0,
            kind: RequestKind::Query,
        }
    }
}

/// Answer to exactly one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialResponse {
    pub ok: bool,
    pub remaining: Material,
}

/// A request paired with the channel its answer goes back on
#[derive(Debug)]
pub(crate) struct Envelope {
    pub request: MaterialRequest,
    pub reply: SyncSender<MaterialResponse>,
}
