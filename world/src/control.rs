//! Ownership state machine that folds faction transactions into territory control.
//!
//! Weights only ever grow, and percentages are always renormalised from the
//! same total, so the control vector sums to 100 after every update. Taking a
//! territory requires a strict majority; falling below 50% never evicts the
//! current owner.

use turf_war_core::{
    ControlError, ControlVector, FactionId, FactionTable, WeightVector, CONTESTED_MIN_ACTIVITY,
    CONTESTED_THRESHOLD, OWNERSHIP_THRESHOLD,
};

use crate::territory::Territory;

/// Ownership change produced by a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) from: Option<FactionId>,
    pub(crate) to: FactionId,
}

/// Result of folding a single transaction into a territory.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) control: ControlVector,
    pub(crate) transition: Option<Transition>,
    pub(crate) contested_changed: Option<bool>,
}

/// Adds `weight` on behalf of `faction` and recomputes the territory's control state.
///
/// A zero weight is accepted and leaves the territory untouched, yielding
/// `Ok(None)`. The territory is only mutated once every check has passed.
pub(crate) fn apply_transaction(
    territory: &mut Territory,
    faction: FactionId,
    weight: f64,
) -> Result<Option<Outcome>, ControlError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ControlError::InvalidWeight(weight));
    }
    if weight == 0.0 {
        return Ok(None);
    }

    let mut weights = territory.weights;
    weights[faction] += weight;
    let control =
        normalize(&weights).ok_or_else(|| ControlError::DegenerateWeights(territory.id()))?;

    let (leader, max_control) = control.leader();
    let prior_owner = territory.owner;
    let contested = is_contested(max_control, weights.total());

    let transition = if max_control > OWNERSHIP_THRESHOLD && prior_owner != Some(leader) {
        Some(Transition {
            from: prior_owner,
            to: leader,
        })
    } else {
        None
    };
    let contested_changed = (contested != territory.contested).then_some(contested);

    territory.weights = weights;
    territory.control = control;
    territory.contested = contested;
    if let Some(transition) = transition {
        territory.owner = Some(transition.to);
    }

    Ok(Some(Outcome {
        control,
        transition,
        contested_changed,
    }))
}

/// Converts accumulated weights into percentage shares.
///
/// Returns `None` when the weights do not sum to a positive, finite total.
pub(crate) fn normalize(weights: &WeightVector) -> Option<ControlVector> {
    let total = weights.total();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    Some(FactionTable::from_fn(|faction| {
        weights[faction] * 100.0 / total
    }))
}

/// Contested territories have seen real activity yet lack a comfortable majority.
pub(crate) fn is_contested(max_control: f64, total_weight: f64) -> bool {
    max_control < CONTESTED_THRESHOLD && total_weight > CONTESTED_MIN_ACTIVITY
}
